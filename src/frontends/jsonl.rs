//! JSON-lines frontend: each input line is parsed as a `ClientMessage` and
//! forwarded to core logic. We reply with a single JSON line per request.
//! An expired question countdown produces an unsolicited `answer_result`.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument};

use crate::frontends::{next_input, Input};
use crate::logic;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
pub async fn run<R, W>(input: R, out: &mut W, state: &AppState) -> io::Result<()>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  info!(target: "learnquest", "JSON-lines session started");
  let mut lines = input.lines();
  loop {
    let reply = match next_input(&mut lines, state).await? {
      Input::Eof => break,
      Input::Expired => expired(state).await,
      Input::Line(line) if line.trim().is_empty() => continue,
      Input::Line(line) => match serde_json::from_str::<ClientMessage>(&line) {
        Ok(incoming) => {
          debug!(target: "learnquest", "Received: {:?}", &incoming);
          handle_client_message(incoming, state).await
        }
        Err(e) => ServerMessage::Error { message: format!("Invalid JSON: {}", e) },
      },
    };

    let body = serde_json::to_string(&reply).unwrap_or_else(|e| {
      error!(target: "learnquest", error = %e, "Serialization error");
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    out.write_all(body.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
  }
  info!(target: "learnquest", "JSON-lines session ended");
  Ok(())
}

async fn expired(state: &AppState) -> ServerMessage {
  match logic::expire_question(state).await {
    Ok(result) => ServerMessage::AnswerResult { result },
    Err(e) => ServerMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub async fn handle_client_message(msg: ClientMessage, state: &AppState) -> ServerMessage {
  match msg {
    ClientMessage::Ping => ServerMessage::Pong,

    ClientMessage::Chat { text } => ServerMessage::ChatReply { turn: logic::handle_chat_message(state, &text).await },

    ClientMessage::RequestQuiz { prompt } => match logic::request_quiz(state, &prompt).await {
      Ok(offer) => ServerMessage::QuizOffer { offer },
      Err(e) => ServerMessage::Error { message: e.to_string() },
    },

    ClientMessage::ConfirmQuiz => match logic::confirm_quiz(state).await {
      Ok(question) => ServerMessage::Question { question },
      Err(e) => ServerMessage::Error { message: e.to_string() },
    },

    ClientMessage::DeclineQuiz => match logic::decline_quiz(state).await {
      Ok(quiz_id) => ServerMessage::QuizDeclined { quiz_id },
      Err(e) => ServerMessage::Error { message: e.to_string() },
    },

    ClientMessage::Answer { text } => match logic::submit_answer(state, &text).await {
      Ok(result) => ServerMessage::AnswerResult { result },
      Err(e) => ServerMessage::Error { message: e.to_string() },
    },

    ClientMessage::ExpireQuestion => expired(state).await,

    ClientMessage::CloseQuiz => ServerMessage::QuizClosed { quiz_id: logic::close_quiz(state).await },

    ClientMessage::Stats => ServerMessage::Stats { stats: logic::stats(state).await },

    ClientMessage::Resources { topic } => {
      let resources = logic::resources(state, topic.as_deref().unwrap_or(""));
      ServerMessage::Resources { topic, resources }
    }

    ClientMessage::ListQuizzes => ServerMessage::Quizzes { quizzes: logic::list_quizzes(state) },

    ClientMessage::ResetProgress => match logic::reset_progress(state).await {
      Ok(()) => ServerMessage::ProgressReset,
      Err(e) => ServerMessage::Error { message: e.to_string() },
    },
  }
}
