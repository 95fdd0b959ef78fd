//! Domain models: quiz definitions, questions, intents, resources and badges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key into the quiz catalog (e.g. "python", "pythonadvanced").
pub type QuizId = String;

/// Stored difficulty of a quiz, also what a learner may ask for.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
  Beginner,
  Advanced,
  Expert,
}

impl Difficulty {
  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "Beginner",
      Difficulty::Advanced => "Advanced",
      Difficulty::Expert => "Expert",
    }
  }

  /// Case-insensitive parse of a stored difficulty string.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_lowercase().as_str() {
      "beginner" => Some(Difficulty::Beginner),
      "advanced" => Some(Difficulty::Advanced),
      "expert" => Some(Difficulty::Expert),
      _ => None,
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  /// Learner picks one of `options`; `answer` is one of them.
  MultipleChoice,
  /// Learner types a token; `answer` must appear in what they typed.
  FillInBlank,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: u32,
  pub question: String,
  #[serde(default)] pub options: Option<Vec<String>>,
  pub answer: String,
  pub kind: QuestionKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizDefinition {
  pub id: QuizId,
  /// Human-readable topic name, also used by the longest-topic fallback.
  pub topic: String,
  pub badge_id: String,
  pub difficulty: Difficulty,
  pub questions: Vec<Question>,
}

/// Coarse purpose of a chat message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
  Learning,
  Question,
  TopicExploration,
  GeneralConversation,
}

impl Intent {
  pub fn label(&self) -> &'static str {
    match self {
      Intent::Learning => "learning",
      Intent::Question => "question",
      Intent::TopicExploration => "topic_exploration",
      Intent::GeneralConversation => "general_conversation",
    }
  }
}

impl fmt::Display for Intent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Per-message classification. Confidence is a heuristic, not a probability.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
  pub intent: Intent,
  pub topic: Option<String>,
  pub confidence: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
  Article,
  Video,
  Course,
  Documentation,
}

impl ResourceKind {
  pub fn label(&self) -> &'static str {
    match self {
      ResourceKind::Article => "article",
      ResourceKind::Video => "video",
      ResourceKind::Course => "course",
      ResourceKind::Documentation => "docs",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearningResource {
  /// Vocabulary topic this link belongs to.
  pub topic: String,
  pub title: String,
  pub url: String,
  pub kind: ResourceKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BadgeDefinition {
  pub id: String,
  pub name: String,
  pub description: String,
}

/// Tier-4 safety net: hand-picked subject words and the quiz per level.
#[derive(Clone, Debug)]
pub struct SubjectFallback {
  pub subjects: Vec<String>,
  pub base: QuizId,
  pub advanced: Option<QuizId>,
  pub expert: Option<QuizId>,
}
