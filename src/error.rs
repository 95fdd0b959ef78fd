//! Error types for the fallible edges: config loading, the local store and
//! quiz flow transitions. Classification and quiz matching have no error
//! channel; "nothing recognized" is a normal outcome there.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse config {path}: {source}")]
  Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store I/O error on {path}: {source}")]
  Io { path: PathBuf, source: io::Error },

  #[error("store file {path} is not a JSON object: {source}")]
  Corrupt { path: PathBuf, source: serde_json::Error },

  #[error("value for key '{key}' could not be encoded: {source}")]
  Encode { key: String, source: serde_json::Error },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
  #[error("unknown quiz '{0}'")]
  UnknownQuiz(String),

  #[error("a quiz is already in progress ({0}); finish or close it first")]
  AlreadyActive(String),

  #[error("no quiz is waiting for confirmation")]
  NothingPending,

  #[error("no quiz is in progress")]
  NotInProgress,
}
