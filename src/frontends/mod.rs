//! Frontend selection plus the stdin reader shared by both frontends.
//!
//! - `console`: plain text for humans, `/commands`
//! - `jsonl`: one JSON message per line each way, for scripts and UIs
//!
//! While a quiz question is open, the next read is bounded by what is left of
//! its countdown; running out is reported as `Input::Expired`.

use std::io;

use tokio::io::{AsyncBufRead, Lines};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::state::AppState;

pub mod console;
pub mod jsonl;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frontend {
  Console,
  Jsonl,
}

impl Frontend {
  /// LEARNQUEST_FRONTEND: "console" (default) or "jsonl".
  pub fn from_env() -> Self {
    match std::env::var("LEARNQUEST_FRONTEND").as_deref().map(str::trim) {
      Ok("jsonl") | Ok("json") => Frontend::Jsonl,
      Ok("console") | Ok("") | Err(_) => Frontend::Console,
      Ok(other) => {
        warn!(target: "learnquest", frontend = %other, "Unknown LEARNQUEST_FRONTEND; using console");
        Frontend::Console
      }
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Frontend::Console => "console",
      Frontend::Jsonl => "jsonl",
    }
  }
}

/// Run the chosen frontend on stdin/stdout until EOF or exit.
pub async fn run(frontend: Frontend, state: &AppState) -> io::Result<()> {
  let stdin = tokio::io::BufReader::new(tokio::io::stdin());
  let mut stdout = tokio::io::stdout();
  match frontend {
    Frontend::Console => console::run(stdin, &mut stdout, state).await,
    Frontend::Jsonl => jsonl::run(stdin, &mut stdout, state).await,
  }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input {
  Line(String),
  Expired,
  Eof,
}

pub(crate) async fn next_input<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, state: &AppState) -> io::Result<Input> {
  let remaining = {
    let session = state.session.read().await;
    session
      .quiz
      .is_in_progress()
      .then(|| session.quiz.limit().saturating_sub(session.elapsed_on_question()))
  };

  let line = match remaining {
    Some(left) => match timeout(left, lines.next_line()).await {
      Ok(line) => line?,
      Err(_) => {
        debug!(target: "quiz", "Question countdown ran out");
        return Ok(Input::Expired);
      }
    },
    None => lines.next_line().await?,
  };
  Ok(line.map_or(Input::Eof, Input::Line))
}
