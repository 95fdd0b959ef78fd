//! Plain-text console: chat freely, steer with `/commands`, answer quiz
//! questions inline against a visible countdown.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, instrument};

use crate::domain::BadgeDefinition;
use crate::error::QuizError;
use crate::frontends::{next_input, Input};
use crate::logic::{self, AnswerResult, ChatTurn, Stats};
use crate::protocol::{parse_command, Command, HELP};
use crate::quiz::QuestionView;
use crate::state::AppState;

const GREETING: &str = "Welcome to LearnQuest! Chat about what you want to learn, or type /help.";

#[instrument(level = "info", skip_all)]
pub async fn run<R, W>(input: R, out: &mut W, state: &AppState) -> io::Result<()>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  info!(target: "learnquest", "Console session started");
  let mut lines = input.lines();
  say(out, GREETING).await?;

  loop {
    let text = match next_input(&mut lines, state).await? {
      Input::Eof => break,
      Input::Expired => match logic::expire_question(state).await {
        Ok(r) => render_answer(&r),
        Err(e) => e.to_string(),
      },
      Input::Line(line) => match parse_command(&line) {
        Command::Exit => break,
        Command::Text(t) if t.is_empty() => continue,
        cmd => dispatch(state, cmd).await,
      },
    };
    say(out, &text).await?;
  }

  say(out, "Goodbye! Keep the streak alive.").await?;
  info!(target: "learnquest", "Console session ended");
  Ok(())
}

async fn dispatch(state: &AppState, cmd: Command) -> String {
  match cmd {
    Command::Text(t) => {
      let in_quiz = state.session.read().await.quiz.is_in_progress();
      if in_quiz {
        or_error(logic::submit_answer(state, &t).await.map(|r| render_answer(&r)))
      } else {
        render_turn(&logic::handle_chat_message(state, &t).await)
      }
    }
    Command::Yes => or_error(logic::confirm_quiz(state).await.map(|q| render_question(&q))),
    Command::No => or_error(logic::decline_quiz(state).await.map(|_| "No problem, maybe later.".to_string())),
    Command::Quiz(arg) if arg.is_empty() => render_quizzes(state),
    Command::Quiz(arg) => or_error(logic::request_quiz(state, &arg).await.map(|o| o.text)),
    Command::Close => match logic::close_quiz(state).await {
      Some(id) => format!("Closed the {id} quiz."),
      None => "No quiz is open.".to_string(),
    },
    Command::Stats => render_stats(&logic::stats(state).await),
    Command::Resources(topic) => render_resources(state, &topic),
    Command::Quizzes => render_quizzes(state),
    Command::Reset => match logic::reset_progress(state).await {
      Ok(()) => "Progress reset. Fresh start!".to_string(),
      Err(e) => format!("Could not reset progress: {e}"),
    },
    Command::Help => HELP.to_string(),
    Command::Unknown(name) => format!("Unknown command /{name}. Type /help for the list."),
    Command::Exit => String::new(),
  }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> io::Result<()> {
  out.write_all(text.as_bytes()).await?;
  out.write_all(b"\n").await?;
  out.flush().await
}

fn or_error(r: Result<String, QuizError>) -> String {
  r.unwrap_or_else(|e| format!("Hmm: {e}."))
}

fn render_turn(turn: &ChatTurn) -> String {
  let mut s = turn.reply.clone();
  s.push_str(&format!("\n(+{} XP)", turn.xp_gained));
  push_rewards(&mut s, turn.level_up, &turn.new_badges);
  if let Some(offer) = &turn.quiz_offer {
    s.push_str("\n\n");
    s.push_str(&offer.text);
  }
  s
}

fn render_question(q: &QuestionView) -> String {
  let mut s = format!("Question {}/{} ({}s): {}", q.number, q.total, q.seconds, q.question);
  match &q.options {
    Some(options) => {
      for (i, o) in options.iter().enumerate() {
        s.push_str(&format!("\n  {}) {}", i + 1, o));
      }
    }
    None => s.push_str("\n  (type your answer)"),
  }
  s
}

fn render_answer(r: &AnswerResult) -> String {
  let fb = &r.feedback;
  let mut s = if fb.correct {
    "Correct!".to_string()
  } else if fb.timed_out {
    format!("Time's up! The answer was: {}", fb.expected)
  } else {
    format!("Not quite. The answer was: {}", fb.expected)
  };

  if let Some(next) = &fb.next {
    s.push_str("\n\n");
    s.push_str(&render_question(next));
  }
  if let Some(o) = &fb.outcome {
    let verdict = if o.passed { "Passed!" } else { "Not passed this time; try again soon." };
    s.push_str(&format!("\n\nQuiz complete: {}/{} correct ({}%). {}", o.correct, o.total, o.percent, verdict));
    s.push_str(&format!("\n(+{} XP)", r.xp_gained));
    push_rewards(&mut s, r.level_up, &r.new_badges);
  }
  s
}

fn push_rewards(s: &mut String, level_up: Option<u32>, badges: &[BadgeDefinition]) {
  if let Some(level) = level_up {
    s.push_str(&format!("\nLevel up! You are now level {level}."));
  }
  for b in badges {
    s.push_str(&format!("\nBadge earned: {} ({})", b.name, b.description));
  }
}

fn render_stats(st: &Stats) -> String {
  let p = &st.progress;
  let mut s = format!(
    "Level {} ({}/{} XP this level), {} XP total\nStreak: {} day(s)\nMessages: {}, questions: {}, quizzes passed: {}",
    p.level, st.level_xp, st.level_size, p.xp, p.streak, p.messages, p.questions, p.quizzes_passed
  );
  if !st.badges.is_empty() {
    let names: Vec<&str> = st.badges.iter().map(|b| b.name.as_str()).collect();
    s.push_str(&format!("\nBadges: {}", names.join(", ")));
  }
  for (topic, pct) in &p.skills {
    s.push_str(&format!("\n  {topic}: {pct}%"));
  }
  s
}

fn render_resources(state: &AppState, topic: &str) -> String {
  let links = logic::resources(state, topic);
  if links.is_empty() {
    return format!("I don't have links for '{topic}' yet.");
  }
  links
    .iter()
    .map(|r| format!("- [{}] {} ({}): {}", r.topic, r.title, r.kind.label(), r.url))
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_quizzes(state: &AppState) -> String {
  let mut s = "Available quizzes (start one with /quiz <id>):".to_string();
  for q in logic::list_quizzes(state) {
    s.push_str(&format!("\n  {:<26} {} ({}, {} questions)", q.id, q.topic, q.difficulty.label(), q.questions));
  }
  s
}
