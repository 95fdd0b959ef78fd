//! XP, levels, daily streaks, badges and per-topic skill progress.
//!
//! Pure bookkeeping over `Progress`; persistence goes through `LocalStore`
//! under fixed keys so a saved profile survives restarts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;
use crate::domain::{ClassificationResult, Intent};
use crate::error::StoreError;
use crate::quiz::QuizOutcome;
use crate::store::{keys, LocalStore};

const QUESTIONS_FOR_CURIOUS_MIND: u32 = 10;
const QUIZZES_FOR_QUIZ_MASTER: u32 = 5;
const MAX_SKILL: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Progress {
  pub xp: u32,
  pub level: u32,
  pub streak: u32,
  pub last_active: Option<NaiveDate>,
  /// Badge ids in the order they were earned.
  pub badges: Vec<String>,
  /// Topic -> percentage (0..=100).
  pub skills: BTreeMap<String, u32>,
  pub messages: u32,
  pub questions: u32,
  pub quizzes_passed: u32,
}

impl Default for Progress {
  fn default() -> Self {
    Self {
      xp: 0,
      level: 1,
      streak: 0,
      last_active: None,
      badges: Vec::new(),
      skills: BTreeMap::new(),
      messages: 0,
      questions: 0,
      quizzes_passed: 0,
    }
  }
}

/// What a single action earned.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Award {
  pub xp_gained: u32,
  /// New level, if this action crossed a level boundary.
  pub level_up: Option<u32>,
  pub new_badges: Vec<String>,
}

impl Progress {
  /// Bookkeeping for one chat message.
  pub fn record_chat_turn(&mut self, c: &ClassificationResult, today: NaiveDate, settings: &Settings) -> Award {
    self.messages += 1;
    if c.intent == Intent::Question {
      self.questions += 1;
    }
    self.touch_streak(today);

    let level_up = self.add_xp(settings.xp_per_message, settings);
    let new_badges = self.check_milestones();
    debug!(target: "chat", xp = self.xp, level = self.level, streak = self.streak, "Chat turn recorded");
    Award { xp_gained: settings.xp_per_message, level_up, new_badges }
  }

  /// Raise a topic's skill percentage, capped at 100. Returns the new value.
  pub fn bump_skill(&mut self, topic: &str, amount: u32) -> u32 {
    let skill = self.skills.entry(topic.to_lowercase()).or_insert(0);
    *skill = skill.saturating_add(amount).min(MAX_SKILL);
    *skill
  }

  pub fn record_quiz(&mut self, outcome: &QuizOutcome, settings: &Settings) -> Award {
    let mut xp = settings.xp_per_correct_answer.saturating_mul(outcome.correct);
    let mut new_badges = Vec::new();
    if outcome.passed {
      xp = xp.saturating_add(settings.xp_per_quiz_pass);
      self.quizzes_passed += 1;
      if self.award(&outcome.badge_id) {
        new_badges.push(outcome.badge_id.clone());
      }
    }
    let level_up = self.add_xp(xp, settings);
    new_badges.extend(self.check_milestones());
    info!(target: "quiz", quiz_id = %outcome.quiz_id, passed = outcome.passed, xp_gained = xp, "Quiz result recorded");
    Award { xp_gained: xp, level_up, new_badges }
  }

  pub fn has_badge(&self, id: &str) -> bool {
    self.badges.iter().any(|b| b == id)
  }

  /// Same day: unchanged. Next day: +1. Any gap (or first visit): 1.
  fn touch_streak(&mut self, today: NaiveDate) {
    self.streak = match self.last_active {
      Some(last) if last == today => self.streak.max(1),
      Some(last) if last.succ_opt() == Some(today) => self.streak + 1,
      _ => 1,
    };
    self.last_active = Some(today);
  }

  fn add_xp(&mut self, amount: u32, settings: &Settings) -> Option<u32> {
    self.xp = self.xp.saturating_add(amount);
    let level = self.xp / settings.level_xp.max(1) + 1;
    if level > self.level {
      self.level = level;
      info!(target: "chat", level, "Level up");
      return Some(level);
    }
    None
  }

  fn award(&mut self, badge: &str) -> bool {
    if self.has_badge(badge) {
      return false;
    }
    self.badges.push(badge.to_string());
    true
  }

  fn check_milestones(&mut self) -> Vec<String> {
    let milestones = [
      ("first_steps", self.messages >= 1),
      ("curious_mind", self.questions >= QUESTIONS_FOR_CURIOUS_MIND),
      ("streak_3", self.streak >= 3),
      ("streak_7", self.streak >= 7),
      ("level_5", self.level >= 5),
      ("quiz_master", self.quizzes_passed >= QUIZZES_FOR_QUIZ_MASTER),
    ];
    milestones
      .into_iter()
      .filter(|(_, reached)| *reached)
      .filter_map(|(id, _)| self.award(id).then(|| id.to_string()))
      .collect()
  }

  /// Read every field from the store; missing keys keep their defaults.
  pub fn load(store: &LocalStore) -> Self {
    let d = Progress::default();
    Self {
      xp: store.get(keys::XP).unwrap_or(d.xp),
      level: store.get(keys::LEVEL).unwrap_or(d.level),
      streak: store.get(keys::STREAK).unwrap_or(d.streak),
      last_active: store.get(keys::LAST_ACTIVE).unwrap_or(d.last_active),
      badges: store.get(keys::BADGES).unwrap_or(d.badges),
      skills: store.get(keys::SKILLS).unwrap_or(d.skills),
      messages: store.get(keys::MESSAGES).unwrap_or(d.messages),
      questions: store.get(keys::QUESTIONS).unwrap_or(d.questions),
      quizzes_passed: store.get(keys::QUIZZES_PASSED).unwrap_or(d.quizzes_passed),
    }
  }

  /// Write every field and flush.
  pub fn save(&self, store: &mut LocalStore) -> Result<(), StoreError> {
    store.set(keys::XP, &self.xp)?;
    store.set(keys::LEVEL, &self.level)?;
    store.set(keys::STREAK, &self.streak)?;
    store.set(keys::LAST_ACTIVE, &self.last_active)?;
    store.set(keys::BADGES, &self.badges)?;
    store.set(keys::SKILLS, &self.skills)?;
    store.set(keys::MESSAGES, &self.messages)?;
    store.set(keys::QUESTIONS, &self.questions)?;
    store.set(keys::QUIZZES_PASSED, &self.quizzes_passed)?;
    store.flush()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).expect("date")
  }

  fn chat(intent: Intent) -> ClassificationResult {
    ClassificationResult { intent, topic: None, confidence: 0.5 }
  }

  fn outcome(correct: u32, passed: bool) -> QuizOutcome {
    QuizOutcome {
      quiz_id: "python".into(),
      topic: "Python Programming".into(),
      correct,
      total: 3,
      percent: correct * 100 / 3,
      passed,
      badge_id: "python_novice".into(),
    }
  }

  #[test]
  fn first_message_awards_xp_streak_and_badge() {
    let s = Settings::default();
    let mut p = Progress::default();
    let award = p.record_chat_turn(&chat(Intent::GeneralConversation), day(1), &s);
    assert_eq!(award.xp_gained, 10);
    assert_eq!(award.level_up, None);
    assert_eq!(award.new_badges, vec!["first_steps".to_string()]);
    assert_eq!((p.xp, p.level, p.streak, p.messages), (10, 1, 1, 1));

    let again = p.record_chat_turn(&chat(Intent::GeneralConversation), day(1), &s);
    assert!(again.new_badges.is_empty());
    assert_eq!(p.streak, 1);
  }

  #[test]
  fn streak_grows_on_consecutive_days_and_resets_on_gaps() {
    let s = Settings::default();
    let mut p = Progress::default();
    let mut earned = Vec::new();
    for d in 1..=3 {
      earned.extend(p.record_chat_turn(&chat(Intent::Learning), day(d), &s).new_badges);
    }
    assert_eq!(p.streak, 3);
    assert!(earned.contains(&"streak_3".to_string()));

    p.record_chat_turn(&chat(Intent::Learning), day(5), &s);
    assert_eq!(p.streak, 1);
    assert!(p.has_badge("streak_3"));
  }

  #[test]
  fn level_follows_xp() {
    let s = Settings::default();
    let mut p = Progress::default();
    let mut level_ups = Vec::new();
    for _ in 0..10 {
      if let Some(l) = p.record_chat_turn(&chat(Intent::Question), day(1), &s).level_up {
        level_ups.push(l);
      }
    }
    assert_eq!(p.xp, 100);
    assert_eq!(level_ups, vec![2]);
    assert_eq!(p.questions, 10);
    assert!(p.has_badge("curious_mind"));
  }

  #[test]
  fn a_week_of_daily_visits_earns_streak_7() {
    let s = Settings::default();
    let mut p = Progress::default();
    let mut earned = Vec::new();
    for d in 1..=6 {
      earned.extend(p.record_chat_turn(&chat(Intent::Learning), day(d), &s).new_badges);
    }
    assert!(!p.has_badge("streak_7"));

    let seventh = p.record_chat_turn(&chat(Intent::Learning), day(7), &s);
    assert_eq!(seventh.new_badges, vec!["streak_7".to_string()]);
    assert_eq!(p.streak, 7);
    assert!(earned.contains(&"streak_3".to_string()));
  }

  #[test]
  fn reaching_level_five_earns_level_5() {
    let s = Settings::default();
    let mut p = Progress { xp: 390, level: 4, ..Progress::default() };
    let award = p.record_chat_turn(&chat(Intent::GeneralConversation), day(1), &s);
    assert_eq!(p.xp, 400);
    assert_eq!(award.level_up, Some(5));
    assert!(award.new_badges.contains(&"level_5".to_string()));

    let next = p.record_chat_turn(&chat(Intent::GeneralConversation), day(1), &s);
    assert!(!next.new_badges.contains(&"level_5".to_string()));
  }

  #[test]
  fn five_passed_quizzes_earn_quiz_master_once() {
    let s = Settings::default();
    let mut p = Progress::default();
    let mut earned = Vec::new();
    for _ in 0..6 {
      earned.extend(p.record_quiz(&outcome(3, true), &s).new_badges);
    }
    assert_eq!(p.quizzes_passed, 6);
    assert_eq!(earned.iter().filter(|b| *b == "quiz_master").count(), 1);
    assert_eq!(p.badges.iter().filter(|b| *b == "quiz_master").count(), 1);
  }

  #[test]
  fn huge_xp_settings_saturate() {
    let s = Settings { xp_per_correct_answer: u32::MAX, xp_per_quiz_pass: u32::MAX, ..Settings::default() };
    let mut p = Progress::default();
    let award = p.record_quiz(&outcome(3, true), &s);
    assert_eq!(award.xp_gained, u32::MAX);
    p.record_quiz(&outcome(3, true), &s);
    assert_eq!(p.xp, u32::MAX);
    assert_eq!(p.bump_skill("ai", u32::MAX), 100);
  }

  #[test]
  fn skill_bumps_are_capped() {
    let mut p = Progress::default();
    assert_eq!(p.bump_skill("Python", 15), 15);
    assert_eq!(p.bump_skill("python", 90), 100);
    assert_eq!(p.skills.get("python"), Some(&100));
  }

  #[test]
  fn quiz_results() {
    let s = Settings::default();
    let mut p = Progress::default();

    let failed = p.record_quiz(&outcome(1, false), &s);
    assert_eq!(failed.xp_gained, 10);
    assert!(failed.new_badges.is_empty());

    let passed = p.record_quiz(&outcome(3, true), &s);
    assert_eq!(passed.xp_gained, 80);
    assert_eq!(passed.new_badges, vec!["python_novice".to_string()]);
    assert_eq!(passed.level_up, None);
    assert_eq!(p.quizzes_passed, 1);

    // Passing again never duplicates the badge.
    let again = p.record_quiz(&outcome(3, true), &s);
    assert!(again.new_badges.is_empty());
    assert_eq!(again.level_up, Some(2));
    assert_eq!(p.badges.iter().filter(|b| *b == "python_novice").count(), 1);
  }

  #[test]
  fn progress_round_trips_through_the_store() {
    let s = Settings::default();
    let mut store = LocalStore::in_memory();
    let mut p = Progress::default();
    p.record_chat_turn(&chat(Intent::Question), day(2), &s);
    p.bump_skill("ai", 12);
    p.save(&mut store).expect("save");

    assert_eq!(Progress::load(&store), p);
    assert_eq!(Progress::load(&LocalStore::in_memory()), Progress::default());
  }
}
