//! Resolve free text to at most one quiz id from the catalog.
//!
//! Five tiers, tried in order; the first tier that yields a candidate wins.
//! Within a tier, table declaration order is the tie-break. The matcher is
//! stateless: suppressing repeated prompts is the caller's job
//! (see `quiz::QuizRequestGate`).

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::domain::{Difficulty, QuizDefinition, QuizId, SubjectFallback};

const EXPERT_WORDS: &[&str] = &["expert", "master", "mastery"];
const ADVANCED_WORDS: &[&str] = &["advanced", "intermediate", "hard", "difficult", "challenging"];
const BEGINNER_WORDS: &[&str] = &["beginner", "basic", "easy", "intro", "novice", "simple"];

const QUIZ_INDICATORS: &[&str] = &[
  "quiz", "test", "assessment", "evaluate", "check", "knowledge", "challenge", "question", "exam",
  "quiz me", "test me", "test my",
];

/// Phrases that make a bare topic mention count as a request (tier 3).
const TOPIC_REQUEST_WORDS: &[&str] = &["learn", "show", "tell me about", "what is"];

/// Tier 3 only looks at this many leading keywords per entry.
const PRIMARY_KEYWORDS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
  /// Keyword substring hit whose stored difficulty equals the requested one.
  KeywordWithDifficulty,
  /// Keyword substring hit, difficulty ignored.
  Keyword,
  /// Word-bounded hit on one of the first keywords.
  PrimaryKeyword,
  /// Hard-coded subject list.
  SubjectFallback,
  /// Topic name appears in the prompt; largest share of the prompt wins.
  TopicName,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizMatch {
  pub quiz_id: QuizId,
  pub tier: MatchTier,
}

#[derive(Clone, Debug)]
struct KeywordEntry {
  quiz_id: QuizId,
  difficulty: Difficulty,
  keywords: Vec<String>,
  primary: Vec<Regex>,
}

#[derive(Clone, Debug)]
struct TopicEntry {
  quiz_id: QuizId,
  topic: String,
  difficulty: Difficulty,
}

#[derive(Clone, Debug)]
pub struct QuizMatcher {
  entries: Vec<KeywordEntry>,
  fallbacks: Vec<SubjectFallback>,
  topics: Vec<TopicEntry>,
  known: HashSet<QuizId>,
}

impl QuizMatcher {
  pub fn new(catalog: &Catalog) -> Self {
    Self::from_tables(catalog.keywords(), catalog.quizzes(), catalog.subject_fallbacks())
  }

  /// Keyword entries for ids missing from `quizzes` are ignored.
  pub(crate) fn from_tables(
    keywords: &[(QuizId, Vec<String>)],
    quizzes: &[QuizDefinition],
    fallbacks: &[SubjectFallback],
  ) -> Self {
    let entries = keywords
      .iter()
      .filter_map(|(id, kws)| {
        let quiz = quizzes.iter().find(|q| &q.id == id)?;
        let keywords: Vec<String> = kws.iter().map(|k| k.to_lowercase()).collect();
        let primary = keywords
          .iter()
          .take(PRIMARY_KEYWORDS)
          .filter_map(|k| match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(k))) {
            Ok(re) => Some(re),
            Err(e) => {
              warn!(target: "quiz", quiz_id = %id, keyword = %k, error = %e, "Keyword cannot be used for word-boundary matching");
              None
            }
          })
          .collect();
        Some(KeywordEntry { quiz_id: id.clone(), difficulty: quiz.difficulty, keywords, primary })
      })
      .collect();

    let topics = quizzes
      .iter()
      .map(|q| TopicEntry { quiz_id: q.id.clone(), topic: q.topic.to_lowercase(), difficulty: q.difficulty })
      .collect();

    Self {
      entries,
      fallbacks: fallbacks.to_vec(),
      topics,
      known: quizzes.iter().map(|q| q.id.clone()).collect(),
    }
  }

  /// Quiz id for `prompt`, or `None` meaning "do not start a quiz".
  pub fn find_best_match(&self, prompt: &str) -> Option<QuizId> {
    self.best_match(prompt).map(|m| m.quiz_id)
  }

  /// Like `find_best_match`, also reporting which tier produced the id.
  pub fn best_match(&self, prompt: &str) -> Option<QuizMatch> {
    let lower = prompt.trim().to_lowercase();
    if lower.is_empty() {
      return None;
    }

    let requested = requested_difficulty(&lower);
    let has_indicator = contains_any(&lower, QUIZ_INDICATORS);
    debug!(target: "quiz", requested = ?requested, has_indicator, "Matching quiz prompt");

    let found = self
      .keyword_tiers(&lower, requested, has_indicator)
      .or_else(|| self.primary_keyword_tier(&lower, has_indicator))
      .or_else(|| self.subject_fallback_tier(&lower))
      .or_else(|| self.topic_name_tier(&lower, requested));

    if let Some(m) = &found {
      debug!(target: "quiz", quiz_id = %m.quiz_id, tier = ?m.tier, "Quiz prompt matched");
    }
    found
  }

  /// Tiers 1 and 2: substring hits over the whole keyword table.
  fn keyword_tiers(&self, lower: &str, requested: Option<Difficulty>, has_indicator: bool) -> Option<QuizMatch> {
    if !has_indicator {
      return None;
    }

    if let Some(e) = self.keyword_hits(lower).find(|e| requested.map_or(true, |d| d == e.difficulty)) {
      return Some(hit(&e.quiz_id, MatchTier::KeywordWithDifficulty));
    }
    self.keyword_hits(lower).next().map(|e| hit(&e.quiz_id, MatchTier::Keyword))
  }

  fn keyword_hits<'a>(&'a self, lower: &'a str) -> impl Iterator<Item = &'a KeywordEntry> + 'a {
    self.entries.iter().filter(move |e| e.keywords.iter().any(|k| lower.contains(k.as_str())))
  }

  /// Tier 3: only the first few keywords, word-bounded.
  fn primary_keyword_tier(&self, lower: &str, has_indicator: bool) -> Option<QuizMatch> {
    if !has_indicator && !contains_any(lower, TOPIC_REQUEST_WORDS) {
      return None;
    }
    self
      .entries
      .iter()
      .find(|e| e.primary.iter().any(|re| re.is_match(lower)))
      .map(|e| hit(&e.quiz_id, MatchTier::PrimaryKeyword))
  }

  /// Tier 4: "quiz"/"test" plus a hand-picked subject, most specific variant.
  fn subject_fallback_tier(&self, lower: &str) -> Option<QuizMatch> {
    if !lower.contains("quiz") && !lower.contains("test") {
      return None;
    }
    let fb = self.fallbacks.iter().find(|fb| fb.subjects.iter().any(|s| lower.contains(s.as_str())))?;

    let wants_expert = contains_any(lower, EXPERT_WORDS);
    let wants_advanced = contains_any(lower, ADVANCED_WORDS);
    let preferred = if wants_expert {
      fb.expert.as_ref().or(fb.advanced.as_ref())
    } else if wants_advanced {
      fb.advanced.as_ref()
    } else {
      None
    };

    preferred
      .filter(|id| self.known.contains(*id))
      .or(Some(&fb.base))
      .filter(|id| self.known.contains(*id))
      .map(|id| hit(id, MatchTier::SubjectFallback))
  }

  /// Tier 5: topic name contained in the prompt; larger share of the prompt wins.
  fn topic_name_tier(&self, lower: &str, requested: Option<Difficulty>) -> Option<QuizMatch> {
    let prompt_len = lower.chars().count() as f32;
    let mut best: Option<(&TopicEntry, f32)> = None;

    for t in &self.topics {
      if t.topic.is_empty() || !lower.contains(t.topic.as_str()) {
        continue;
      }
      if requested.is_some_and(|d| d != t.difficulty) {
        continue;
      }
      let confidence = t.topic.chars().count() as f32 / prompt_len;
      if best.map_or(true, |(_, c)| confidence > c) {
        best = Some((t, confidence));
      }
    }

    best.map(|(t, _)| hit(&t.quiz_id, MatchTier::TopicName))
  }
}

/// Expert beats advanced beats beginner when several are mentioned.
pub fn requested_difficulty(lower: &str) -> Option<Difficulty> {
  if contains_any(lower, EXPERT_WORDS) {
    Some(Difficulty::Expert)
  } else if contains_any(lower, ADVANCED_WORDS) {
    Some(Difficulty::Advanced)
  } else if contains_any(lower, BEGINNER_WORDS) {
    Some(Difficulty::Beginner)
  } else {
    None
  }
}

fn contains_any(lower: &str, words: &[&str]) -> bool {
  words.iter().any(|w| lower.contains(w))
}

fn hit(id: &str, tier: MatchTier) -> QuizMatch {
  QuizMatch { quiz_id: id.to_string(), tier }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Question, QuestionKind};

  fn matcher() -> (Catalog, QuizMatcher) {
    let catalog = Catalog::builtin();
    let m = QuizMatcher::new(&catalog);
    (catalog, m)
  }

  fn tiny_quiz(id: &str, topic: &str, difficulty: Difficulty) -> QuizDefinition {
    QuizDefinition {
      id: id.into(),
      topic: topic.into(),
      badge_id: format!("{id}_badge"),
      difficulty,
      questions: vec![Question { id: 1, question: "?".into(), options: None, answer: "x".into(), kind: QuestionKind::FillInBlank }],
    }
  }

  #[test]
  fn empty_prompt_matches_nothing() {
    let (_, m) = matcher();
    assert_eq!(m.find_best_match(""), None);
    assert_eq!(m.find_best_match("   "), None);
  }

  #[test]
  fn beginner_python_quiz() {
    let (catalog, m) = matcher();
    let found = m.best_match("give me a beginner python quiz").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "python".into(), tier: MatchTier::KeywordWithDifficulty });
    assert_eq!(catalog.quiz("python").map(|q| q.difficulty), Some(Difficulty::Beginner));
  }

  #[test]
  fn expert_python_quiz_prefers_expert_variant() {
    let (catalog, m) = matcher();
    let id = m.find_best_match("give me an expert python quiz").expect("match");
    let quiz = catalog.quiz(&id).expect("in catalog");
    assert_eq!(id, "pythonexpert");
    assert_eq!(quiz.difficulty, Difficulty::Expert);
  }

  #[test]
  fn advanced_request_skips_earlier_beginner_hit() {
    let (_, m) = matcher();
    let found = m.best_match("give me an advanced python quiz").expect("match");
    assert_eq!(found.quiz_id, "pythonadvanced");
    assert_eq!(found.tier, MatchTier::KeywordWithDifficulty);
  }

  #[test]
  fn web_development_quiz() {
    let (catalog, m) = matcher();
    let id = m.find_best_match("quiz me on web development").expect("match");
    assert_eq!(id, "webdev");
    let quiz = catalog.quiz(&id).expect("in catalog");
    assert!(quiz.topic.to_lowercase().contains("web"));
  }

  #[test]
  fn difficulty_mismatch_falls_back_to_any_difficulty() {
    let (_, m) = matcher();
    // The only deep learning quiz is Advanced.
    let found = m.best_match("give me a beginner deep learning quiz").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "deeplearning".into(), tier: MatchTier::Keyword });
  }

  #[test]
  fn table_order_decides_between_overlapping_entries() {
    let (_, m) = matcher();
    // Both "python" and "python decorators" match; the base entry is declared first.
    assert_eq!(m.find_best_match("quiz me on python decorators").as_deref(), Some("python"));
  }

  #[test]
  fn reordering_the_table_flips_the_winner() {
    let quizzes = vec![tiny_quiz("alpha", "Alpha", Difficulty::Beginner), tiny_quiz("beta", "Beta", Difficulty::Beginner)];
    let forward = vec![("alpha".to_string(), vec!["alpha".to_string()]), ("beta".to_string(), vec!["beta".to_string()])];
    let backward: Vec<_> = forward.iter().rev().cloned().collect();

    let prompt = "quiz on alpha and beta";
    let m1 = QuizMatcher::from_tables(&forward, &quizzes, &[]);
    let m2 = QuizMatcher::from_tables(&backward, &quizzes, &[]);
    for _ in 0..3 {
      assert_eq!(m1.find_best_match(prompt).as_deref(), Some("alpha"));
      assert_eq!(m2.find_best_match(prompt).as_deref(), Some("beta"));
    }
  }

  #[test]
  fn topic_request_uses_word_bounded_primary_keywords() {
    let (_, m) = matcher();
    let found = m.best_match("tell me about python").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "python".into(), tier: MatchTier::PrimaryKeyword });

    // No word boundary inside "pythonic".
    assert_eq!(m.find_best_match("show me pythonic idioms"), None);
    // A topic mention with neither a quiz word nor a request phrase is not enough.
    assert_eq!(m.find_best_match("python is fun"), None);
  }

  #[test]
  fn primary_tier_ignores_keywords_past_the_first_three() {
    let quizzes = vec![tiny_quiz("alpha", "Alpha Quiz", Difficulty::Beginner)];
    let table = vec![(
      "alpha".to_string(),
      vec!["one".to_string(), "two".to_string(), "three".to_string(), "four".to_string()],
    )];
    let m = QuizMatcher::from_tables(&table, &quizzes, &[]);
    assert_eq!(m.find_best_match("show me three").as_deref(), Some("alpha"));
    assert_eq!(m.find_best_match("show me four"), None);
  }

  #[test]
  fn subject_fallback_catches_loose_phrasing() {
    let (_, m) = matcher();
    let found = m.best_match("quiz me about cyber stuff").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "cybersecurity".into(), tier: MatchTier::SubjectFallback });

    let found = m.best_match("expert test on my web skills").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "webdevexpert".into(), tier: MatchTier::SubjectFallback });
  }

  #[test]
  fn subject_fallback_uses_closest_available_variant() {
    let quizzes = vec![tiny_quiz("sec", "Sec", Difficulty::Beginner), tiny_quiz("secadv", "Sec Adv", Difficulty::Advanced)];
    let fallbacks = vec![SubjectFallback {
      subjects: vec!["cyber".into()],
      base: "sec".into(),
      advanced: Some("secadv".into()),
      expert: None,
    }];
    let m = QuizMatcher::from_tables(&[], &quizzes, &fallbacks);
    assert_eq!(m.find_best_match("expert cyber test").as_deref(), Some("secadv"));
    assert_eq!(m.find_best_match("intermediate cyber quiz").as_deref(), Some("secadv"));
    assert_eq!(m.find_best_match("cyber quiz").as_deref(), Some("sec"));
  }

  #[test]
  fn topic_name_fallback_prefers_largest_share() {
    let (_, m) = matcher();
    let found = m.best_match("i'd love some soft skills practice").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "softskills".into(), tier: MatchTier::TopicName });

    // Both topic names appear; the longer one covers more of the prompt.
    assert_eq!(m.find_best_match("communication skills or soft skills").as_deref(), Some("communication"));
    // Requested difficulty filters the candidates.
    assert_eq!(m.find_best_match("advanced python").as_deref(), Some("pythonadvanced"));
    assert_eq!(m.find_best_match("expert data science"), None);
  }

  #[test]
  fn topic_name_ties_go_to_the_earliest_quiz() {
    let first = tiny_quiz("first", "Rust", Difficulty::Beginner);
    let second = tiny_quiz("second", "Java", Difficulty::Beginner);

    let m = QuizMatcher::from_tables(&[], &[first.clone(), second.clone()], &[]);
    let found = m.best_match("rust java").expect("match");
    assert_eq!(found, QuizMatch { quiz_id: "first".into(), tier: MatchTier::TopicName });

    let m = QuizMatcher::from_tables(&[], &[second, first], &[]);
    assert_eq!(m.find_best_match("rust java").as_deref(), Some("second"));
  }

  #[test]
  fn returned_ids_are_always_in_the_catalog() {
    let (catalog, m) = matcher();
    for prompt in [
      "quiz me",
      "test my knowledge of machine learning",
      "challenge me on data analysis",
      "an exam about neural networks",
      "check my communication",
      "hard ai test",
      "what is teamwork",
      "random chatter",
    ] {
      if let Some(id) = m.find_best_match(prompt) {
        assert!(catalog.contains(&id), "{prompt} -> {id}");
      }
    }
  }

  #[test]
  fn matching_is_repeatable() {
    let (_, m) = matcher();
    for prompt in ["give me a beginner python quiz", "quiz me on web development", "hello"] {
      assert_eq!(m.find_best_match(prompt), m.find_best_match(prompt));
    }
  }

  #[test]
  fn difficulty_priority_is_expert_advanced_beginner() {
    assert_eq!(requested_difficulty("easy or expert"), Some(Difficulty::Expert));
    assert_eq!(requested_difficulty("basic to intermediate"), Some(Difficulty::Advanced));
    assert_eq!(requested_difficulty("a simple one"), Some(Difficulty::Beginner));
    assert_eq!(requested_difficulty("whatever"), None);
  }
}
