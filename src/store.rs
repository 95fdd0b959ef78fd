//! Local key-value persistence: a single JSON object on disk, shaped like
//! browser local storage (flat string keys, JSON values).
//!
//! Without a path the store lives in memory only and `flush` is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::StoreError;

pub mod keys {
  pub const XP: &str = "learnquest.xp";
  pub const LEVEL: &str = "learnquest.level";
  pub const STREAK: &str = "learnquest.streak";
  pub const LAST_ACTIVE: &str = "learnquest.last_active";
  pub const BADGES: &str = "learnquest.badges";
  pub const SKILLS: &str = "learnquest.skills";
  pub const MESSAGES: &str = "learnquest.messages";
  pub const QUESTIONS: &str = "learnquest.questions";
  pub const QUIZZES_PASSED: &str = "learnquest.quizzes_passed";
}

#[derive(Debug, Default)]
pub struct LocalStore {
  path: Option<PathBuf>,
  data: Map<String, Value>,
}

impl LocalStore {
  pub fn in_memory() -> Self {
    Self::default()
  }

  /// Open a store file. A missing file is an empty store; anything that is
  /// not a JSON object is `StoreError::Corrupt`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
    let path = path.as_ref().to_path_buf();
    let data = match fs::read_to_string(&path) {
      Ok(raw) if raw.trim().is_empty() => Map::new(),
      Ok(raw) => serde_json::from_str::<Map<String, Value>>(&raw)
        .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        info!(target: "learnquest", path = %path.display(), "No saved progress; starting fresh");
        Map::new()
      }
      Err(source) => return Err(StoreError::Io { path, source }),
    };
    debug!(target: "learnquest", path = %path.display(), keys = data.len(), "Store opened");
    Ok(Self { path: Some(path), data })
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Typed read. A value that no longer decodes is treated as absent.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let value = self.data.get(key)?;
    match serde_json::from_value(value.clone()) {
      Ok(v) => Some(v),
      Err(e) => {
        warn!(target: "learnquest", %key, error = %e, "Ignoring undecodable stored value");
        None
      }
    }
  }

  pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
    self.data.insert(key.to_string(), value);
    Ok(())
  }

  pub fn remove(&mut self, key: &str) -> bool {
    self.data.remove(key).is_some()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  /// Persist to disk: write a sibling temp file, then rename over the target.
  pub fn flush(&self) -> Result<(), StoreError> {
    let Some(path) = &self.path else {
      return Ok(());
    };
    let io_err = |source: std::io::Error| StoreError::Io { path: path.clone(), source };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      fs::create_dir_all(dir).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(&self.data)
      .map_err(|source| StoreError::Encode { key: "*".into(), source })?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, body).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    debug!(target: "learnquest", path = %path.display(), keys = self.data.len(), "Store flushed");
    Ok(())
  }
}
