//! Public protocol: JSON-lines messages (serde ready) and console commands.
//! Keep this small and stable to evolve the assistant and its clients independently.

use serde::{Deserialize, Serialize};

use crate::domain::{LearningResource, QuizId};
use crate::logic::{AnswerResult, ChatTurn, QuizOffer, QuizSummary, Stats};
use crate::quiz::QuestionView;

/// Messages a client sends, one JSON object per line.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    Chat {
        text: String,
    },
    RequestQuiz {
        /// Quiz id or free text.
        prompt: String,
    },
    ConfirmQuiz,
    DeclineQuiz,
    Answer {
        text: String,
    },
    ExpireQuestion,
    CloseQuiz,
    Stats,
    Resources {
        #[serde(default)]
        topic: Option<String>,
    },
    ListQuizzes,
    ResetProgress,
}

/// Messages the assistant writes back, one JSON object per line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Pong,
    ChatReply {
        turn: ChatTurn,
    },
    QuizOffer {
        offer: QuizOffer,
    },
    Question {
        question: QuestionView,
    },
    AnswerResult {
        result: AnswerResult,
    },
    QuizDeclined {
        quiz_id: QuizId,
    },
    QuizClosed {
        quiz_id: Option<QuizId>,
    },
    Stats {
        stats: Stats,
    },
    Resources {
        topic: Option<String>,
        resources: Vec<LearningResource>,
    },
    Quizzes {
        quizzes: Vec<QuizSummary>,
    },
    ProgressReset,
    Error {
        message: String,
    },
}

/// Console input. Anything not starting with `/` is chat (or an answer while
/// a quiz runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Text(String),
    Yes,
    No,
    Quiz(String),
    Close,
    Stats,
    Resources(String),
    Quizzes,
    Reset,
    Help,
    Exit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /quiz <id or topic>   offer a quiz
  /yes, /no             accept or skip the offered quiz
  /close                leave the current quiz
  /quizzes              list every quiz
  /resources [topic]    learning links
  /stats                XP, level, streak, badges and skills
  /reset                wipe saved progress
  /help                 this text
  /exit                 quit
Anything else is a chat message, or your answer while a quiz is running.";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Text(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };
    match name.to_lowercase().as_str() {
        "yes" | "y" | "start" => Command::Yes,
        "no" | "n" | "skip" => Command::No,
        "quiz" => Command::Quiz(arg.to_string()),
        "close" | "stop" => Command::Close,
        "stats" | "progress" => Command::Stats,
        "resources" | "links" => Command::Resources(arg.to_string()),
        "quizzes" | "list" => Command::Quizzes,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        _ => Command::Unknown(name.to_string()),
    }
}
