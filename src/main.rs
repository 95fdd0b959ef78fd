//! LearnQuest · gamified learning assistant
//!
//! - Rule-based intent detection and canned, topic-aware replies
//! - Quizzes picked from free text, answered against a per-question countdown
//! - XP, levels, daily streaks, badges and skills saved to a local JSON file
//! - Console or JSON-lines frontend on stdin/stdout
//!
//! Important env variables:
//!   LEARNQUEST_CONFIG_PATH : path to TOML config (settings, replies, extra quizzes)
//!   LEARNQUEST_STATE_PATH  : progress file; unset keeps progress in memory
//!   LEARNQUEST_FRONTEND    : "console" (default) or "jsonl"
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod catalog;
mod intent;
mod matcher;
mod quiz;
mod gamification;
mod store;
mod state;
mod protocol;
mod logic;
mod frontends;

use tracing::{info, instrument};

use crate::frontends::Frontend;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog, settings and saved progress.
  let state = AppState::from_env()?;

  let frontend = Frontend::from_env();
  info!(target: "learnquest", frontend = frontend.label(), "LearnQuest ready");

  tokio::select! {
    res = frontends::run(frontend, &state) => res?,
    _ = tokio::signal::ctrl_c() => {
      info!(target: "learnquest", "Interrupted; saving progress");
      state.session.write().await.persist();
    }
  }
  Ok(())
}
