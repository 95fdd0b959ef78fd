//! Static lookup tables consumed by the classifier and the matcher.
//!
//! Built once at startup (seeds + optional TOML extras) and never mutated
//! afterwards. All tables keep declaration order, which is the tie-break for
//! every "first match wins" rule downstream.

use std::collections::HashMap;

use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::{
  BadgeDefinition, Difficulty, LearningResource, Question, QuestionKind, QuizDefinition, QuizId,
  SubjectFallback,
};
use crate::seeds::{keyword_table, seed_badges, seed_quizzes, seed_resources, subject_fallbacks, topic_vocabulary};

#[derive(Clone, Debug)]
pub struct Catalog {
  vocabulary: Vec<String>,
  keywords: Vec<(QuizId, Vec<String>)>,
  quizzes: Vec<QuizDefinition>,
  by_id: HashMap<QuizId, usize>,
  fallbacks: Vec<SubjectFallback>,
  resources: Vec<LearningResource>,
  badges: Vec<BadgeDefinition>,
}

impl Catalog {
  /// Built-in content only.
  pub fn builtin() -> Self {
    Self::with_config(&AppConfig::default())
  }

  /// Built-in content extended with config quizzes, keyword aliases and resources.
  #[instrument(level = "info", skip_all)]
  pub fn with_config(cfg: &AppConfig) -> Self {
    let mut quizzes = seed_quizzes();
    let mut badges = seed_badges();

    for qc in &cfg.quizzes {
      let Some(difficulty) = Difficulty::parse(&qc.difficulty) else {
        error!(target: "quiz", id = %qc.id, difficulty = %qc.difficulty, "Skipping config quiz: unknown difficulty.");
        continue;
      };
      if qc.questions.is_empty() {
        error!(target: "quiz", id = %qc.id, "Skipping config quiz: no questions.");
        continue;
      }
      if let Some((q, reason)) = qc.questions.iter().find_map(|q| validate_question(q).err().map(|r| (q.id, r))) {
        error!(target: "quiz", id = %qc.id, question = q, %reason, "Skipping config quiz: invalid question.");
        continue;
      }
      if quizzes.iter().any(|existing| existing.id == qc.id) {
        error!(target: "quiz", id = %qc.id, "Skipping config quiz: id already in catalog.");
        continue;
      }
      let badge_id = qc.badge_id.clone().unwrap_or_else(|| format!("{}_badge", qc.id));
      if !badges.iter().any(|b| b.id == badge_id) {
        badges.push(BadgeDefinition {
          id: badge_id.clone(),
          name: format!("{} Badge", qc.topic),
          description: format!("Passed the {} quiz", qc.topic),
        });
      }
      quizzes.push(QuizDefinition {
        id: qc.id.clone(),
        topic: qc.topic.clone(),
        badge_id,
        difficulty,
        questions: qc.questions.clone(),
      });
    }

    let by_id: HashMap<QuizId, usize> = quizzes.iter().enumerate().map(|(i, q)| (q.id.clone(), i)).collect();

    let mut keywords = keyword_table();
    for kc in &cfg.keywords {
      let aliases: Vec<String> = kc.keywords.iter().map(|k| k.trim().to_lowercase()).filter(|k| !k.is_empty()).collect();
      match keywords.iter_mut().find(|(id, _)| *id == kc.quiz_id) {
        Some((_, existing)) => existing.extend(aliases),
        None => keywords.push((kc.quiz_id.clone(), aliases)),
      }
    }
    keywords.retain(|(id, _)| {
      let known = by_id.contains_key(id);
      if !known {
        warn!(target: "quiz", %id, "Dropping keyword entry for a quiz that is not in the catalog.");
      }
      known
    });

    let mut resources = seed_resources();
    resources.extend(cfg.resources.iter().map(|r| LearningResource {
      topic: r.topic.to_lowercase(),
      title: r.title.clone(),
      url: r.url.clone(),
      kind: r.kind.clone(),
    }));

    info!(target: "quiz", quizzes = quizzes.len(), keyword_entries = keywords.len(), resources = resources.len(), "Catalog ready");

    Self {
      vocabulary: topic_vocabulary(),
      keywords,
      quizzes,
      by_id,
      fallbacks: subject_fallbacks(),
      resources,
      badges,
    }
  }

  pub fn vocabulary(&self) -> &[String] {
    &self.vocabulary
  }

  pub fn keywords(&self) -> &[(QuizId, Vec<String>)] {
    &self.keywords
  }

  pub fn subject_fallbacks(&self) -> &[SubjectFallback] {
    &self.fallbacks
  }

  /// All quizzes, in declaration order.
  pub fn quizzes(&self) -> &[QuizDefinition] {
    &self.quizzes
  }

  pub fn quiz(&self, id: &str) -> Option<&QuizDefinition> {
    self.by_id.get(id).map(|&i| &self.quizzes[i])
  }

  #[allow(dead_code)]
  pub fn contains(&self, id: &str) -> bool {
    self.by_id.contains_key(id)
  }

  pub fn resources_for(&self, topic: &str) -> Vec<&LearningResource> {
    let topic = topic.to_lowercase();
    self.resources.iter().filter(|r| r.topic == topic).collect()
  }

  pub fn badge(&self, id: &str) -> Option<&BadgeDefinition> {
    self.badges.iter().find(|b| b.id == id)
  }
}

/// Structural check for a question: multiple-choice answers must be one of
/// the options (case-insensitive) and no answer may be empty.
pub fn validate_question(q: &Question) -> Result<(), String> {
  if q.answer.trim().is_empty() {
    return Err("empty answer".into());
  }
  match q.kind {
    QuestionKind::MultipleChoice => {
      let options = q.options.as_deref().unwrap_or_default();
      if options.is_empty() {
        return Err("multiple-choice question without options".into());
      }
      if !options.iter().any(|o| o.eq_ignore_ascii_case(q.answer.trim())) {
        return Err(format!("answer '{}' is not one of the options", q.answer));
      }
      Ok(())
    }
    QuestionKind::FillInBlank => Ok(()),
  }
}
