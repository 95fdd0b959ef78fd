//! Loading assistant configuration (settings, reply templates and optional
//! extra content) from TOML.
//!
//! See `AppConfig` for the expected schema. Every section is optional:
//!
//! ```toml
//! [settings]
//! question_seconds = 45
//! pass_threshold = 80
//!
//! [responses]
//! learning_topic = ["Let's dig into {topic}!"]
//!
//! [[quizzes]]
//! id = "rust"
//! topic = "Rust Programming"
//! difficulty = "beginner"
//! questions = [
//!   { id = 1, question = "Keyword for immutable bindings?", answer = "let", kind = "fill_in_blank" },
//! ]
//!
//! [[keywords]]
//! quiz_id = "rust"
//! keywords = ["rust", "cargo", "borrow checker"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Question, ResourceKind};
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub responses: Responses,
  #[serde(default)]
  pub quizzes: Vec<QuizCfg>,
  #[serde(default)]
  pub keywords: Vec<KeywordCfg>,
  #[serde(default)]
  pub resources: Vec<ResourceCfg>,
}

/// Tunables for quiz timing and the XP economy.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Per-question countdown.
  pub question_seconds: u64,
  /// Percentage of correct answers needed to pass.
  pub pass_threshold: u32,
  pub xp_per_message: u32,
  pub xp_per_correct_answer: u32,
  pub xp_per_quiz_pass: u32,
  /// XP needed per level.
  pub level_xp: u32,
  /// Inclusive range of the skill bump applied when a topic is mentioned.
  pub skill_bump_min: u32,
  pub skill_bump_max: u32,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      question_seconds: 30,
      pass_threshold: 60,
      xp_per_message: 10,
      xp_per_correct_answer: 10,
      xp_per_quiz_pass: 50,
      level_xp: 100,
      skill_bump_min: 5,
      skill_bump_max: 15,
    }
  }
}

/// Canned reply templates per intent. `{topic}` is replaced by the detected topic.
/// One template is picked at random per reply.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Responses {
  pub learning_topic: Vec<String>,
  pub learning_general: Vec<String>,
  pub question_topic: Vec<String>,
  pub question_general: Vec<String>,
  pub topic_exploration: Vec<String>,
  pub general_conversation: Vec<String>,
  pub quiz_offer: String,
  pub quiz_not_found: String,
}

impl Default for Responses {
  fn default() -> Self {
    Self {
      learning_topic: vec![
        "Great choice! Let's build your {topic} skills step by step. I'll start with the core ideas and we can go deeper from there.".into(),
        "Learning {topic} is a fantastic goal. Here's a path that works well for most people, starting with the fundamentals.".into(),
        "Let's study {topic} together! Ask me anything along the way, or ask for a quiz when you feel ready.".into(),
      ],
      learning_general: vec![
        "I love your enthusiasm for learning! Which topic would you like to start with? Python, web development, AI and data science are popular picks.".into(),
        "Let's learn something new today. Tell me a topic and I'll put together a plan.".into(),
      ],
      question_topic: vec![
        "Good question about {topic}! Let me break it down for you.".into(),
        "That's a common question when working with {topic}. Here's how I'd think about it.".into(),
      ],
      question_general: vec![
        "Interesting question! Could you tell me which topic it relates to so I can give a focused answer?".into(),
        "Let me think about that. If you name the subject, I can point you to the right resources too.".into(),
      ],
      topic_exploration: vec![
        "{topic} is a rich area to explore. Want a learning plan, some resources, or a quick quiz?".into(),
        "Curious about {topic}? I can explain the basics or test what you already know.".into(),
      ],
      general_conversation: vec![
        "I'm here to help you learn! Ask me about a topic, or say \"quiz me\" to test your knowledge.".into(),
        "Thanks for chatting! Keep the streak going by learning something every day.".into(),
        "Tell me what you'd like to learn next and I'll help you get there.".into(),
      ],
      quiz_offer: "I found the {topic} quiz ({difficulty}, {count} questions). Type /yes to start or /no to skip.".into(),
      quiz_not_found: "I couldn't find a quiz for that. Type /quizzes to see everything available.".into(),
    }
  }
}

/// Extra quiz accepted from TOML. Questions follow the built-in schema.
#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  pub id: String,
  pub topic: String,
  #[serde(default)] pub badge_id: Option<String>,
  pub difficulty: String,
  #[serde(default)] pub questions: Vec<Question>,
}

/// Keyword aliases for a quiz id; extends an existing table entry or adds a new one.
#[derive(Clone, Debug, Deserialize)]
pub struct KeywordCfg {
  pub quiz_id: String,
  pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResourceCfg {
  pub topic: String,
  pub title: String,
  pub url: String,
  #[serde(default = "default_resource_kind")] pub kind: ResourceKind,
}

fn default_resource_kind() -> ResourceKind {
  ResourceKind::Article
}

/// Parse a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
  let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  toml::from_str::<AppConfig>(&raw).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Attempt to load `AppConfig` from LEARNQUEST_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = PathBuf::from(std::env::var("LEARNQUEST_CONFIG_PATH").ok()?);
  match load_config(&path) {
    Ok(cfg) => {
      info!(target: "learnquest", path = %path.display(), quizzes = cfg.quizzes.len(), "Loaded config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "learnquest", error = %e, "Ignoring config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionKind;

  #[test]
  fn empty_document_uses_defaults() {
    let cfg: AppConfig = toml::from_str("").expect("parse");
    assert_eq!(cfg.settings.question_seconds, 30);
    assert_eq!(cfg.settings.pass_threshold, 60);
    assert!(!cfg.responses.general_conversation.is_empty());
    assert!(cfg.quizzes.is_empty());
  }

  #[test]
  fn partial_settings_keep_other_defaults() {
    let cfg: AppConfig = toml::from_str("[settings]\npass_threshold = 80\n").expect("parse");
    assert_eq!(cfg.settings.pass_threshold, 80);
    assert_eq!(cfg.settings.level_xp, 100);
  }

  #[test]
  fn quizzes_and_keywords_parse() {
    let doc = r#"
      [[quizzes]]
      id = "rust"
      topic = "Rust Programming"
      difficulty = "beginner"
      questions = [
        { id = 1, question = "Keyword for immutable bindings?", answer = "let", kind = "fill_in_blank" },
        { id = 2, question = "Package manager?", options = ["npm", "cargo"], answer = "cargo", kind = "multiple_choice" },
      ]

      [[keywords]]
      quiz_id = "rust"
      keywords = ["rust", "cargo"]

      [[resources]]
      topic = "rust"
      title = "The Book"
      url = "https://doc.rust-lang.org/book/"
    "#;
    let cfg: AppConfig = toml::from_str(doc).expect("parse");
    assert_eq!(cfg.quizzes.len(), 1);
    assert_eq!(cfg.quizzes[0].questions[1].kind, QuestionKind::MultipleChoice);
    assert_eq!(cfg.keywords[0].keywords, vec!["rust", "cargo"]);
    assert!(matches!(cfg.resources[0].kind, ResourceKind::Article));
  }

  #[test]
  fn load_config_reports_missing_file() {
    let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
