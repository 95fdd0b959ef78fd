//! Quiz flow owned by the chat session: confirmation, per-question countdown,
//! answer checking and the final score.
//!
//! Phases: `Idle -> ConfirmationPending -> InProgress -> Complete`. Only one
//! quiz can be active at a time.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Question, QuestionKind, QuizDefinition, QuizId};
use crate::error::QuizError;

/// Remembers the previous prompt that was routed to the quiz matcher so the
/// same prompt twice in a row does not raise a second confirmation.
#[derive(Clone, Debug, Default)]
pub struct QuizRequestGate {
  last_attempt: Option<String>,
}

impl QuizRequestGate {
  /// True if `prompt` differs from the last admitted one; remembers it.
  pub fn admit(&mut self, prompt: &str) -> bool {
    let norm = prompt.trim().to_lowercase();
    if self.last_attempt.as_deref() == Some(norm.as_str()) {
      debug!(target: "quiz", "Suppressing repeated quiz prompt");
      return false;
    }
    self.last_attempt = Some(norm);
    true
  }

  pub fn reset(&mut self) {
    self.last_attempt = None;
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerRecord {
  pub question_id: u32,
  pub given: Option<String>,
  pub correct: bool,
  pub timed_out: bool,
}

#[derive(Clone, Debug)]
pub struct QuizRun {
  pub run_id: Uuid,
  pub quiz: QuizDefinition,
  pub index: usize,
  pub answers: Vec<AnswerRecord>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct QuizOutcome {
  pub quiz_id: QuizId,
  pub topic: String,
  pub correct: u32,
  pub total: u32,
  pub percent: u32,
  pub passed: bool,
  pub badge_id: String,
}

#[derive(Clone, Debug)]
pub enum QuizPhase {
  Idle,
  ConfirmationPending(QuizDefinition),
  InProgress(QuizRun),
  Complete(QuizOutcome),
}

/// What the learner sees for the current question.
#[derive(Clone, Debug, Serialize)]
pub struct QuestionView {
  pub quiz_id: QuizId,
  pub number: usize,
  pub total: usize,
  pub question: String,
  pub kind: QuestionKind,
  pub options: Option<Vec<String>>,
  pub seconds: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerFeedback {
  pub correct: bool,
  pub timed_out: bool,
  pub expected: String,
  /// Next question, if any remain.
  pub next: Option<QuestionView>,
  /// Set once the last question has been answered.
  pub outcome: Option<QuizOutcome>,
}

#[derive(Clone, Debug)]
pub struct QuizFlow {
  phase: QuizPhase,
  limit: Duration,
  pass_threshold: u32,
}

impl QuizFlow {
  pub fn new(limit: Duration, pass_threshold: u32) -> Self {
    Self { phase: QuizPhase::Idle, limit, pass_threshold }
  }

  #[allow(dead_code)]
  pub fn phase(&self) -> &QuizPhase {
    &self.phase
  }

  pub fn limit(&self) -> Duration {
    self.limit
  }

  pub fn is_in_progress(&self) -> bool {
    matches!(self.phase, QuizPhase::InProgress(_))
  }

  /// Ask for confirmation to start `quiz`. Replaces a pending request.
  pub fn request(&mut self, quiz: &QuizDefinition) -> Result<(), QuizError> {
    if let QuizPhase::InProgress(run) = &self.phase {
      return Err(QuizError::AlreadyActive(run.quiz.id.clone()));
    }
    debug!(target: "quiz", quiz_id = %quiz.id, "Quiz awaiting confirmation");
    self.phase = QuizPhase::ConfirmationPending(quiz.clone());
    Ok(())
  }

  pub fn confirm(&mut self) -> Result<QuestionView, QuizError> {
    let QuizPhase::ConfirmationPending(quiz) = &self.phase else {
      return Err(QuizError::NothingPending);
    };
    let run = QuizRun { run_id: Uuid::new_v4(), quiz: quiz.clone(), index: 0, answers: Vec::new() };
    info!(target: "quiz", quiz_id = %run.quiz.id, run_id = %run.run_id, questions = run.quiz.questions.len(), "Quiz started");
    let view = self.view(&run);
    self.phase = QuizPhase::InProgress(run);
    view.ok_or(QuizError::NotInProgress)
  }

  pub fn decline(&mut self) -> Result<QuizId, QuizError> {
    let QuizPhase::ConfirmationPending(quiz) = &self.phase else {
      return Err(QuizError::NothingPending);
    };
    let id = quiz.id.clone();
    self.phase = QuizPhase::Idle;
    Ok(id)
  }

  pub fn current_question(&self) -> Option<QuestionView> {
    match &self.phase {
      QuizPhase::InProgress(run) => self.view(run),
      _ => None,
    }
  }

  /// Answer the current question. An answer arriving after the countdown
  /// counts as timed out.
  pub fn submit_answer(&mut self, given: &str, elapsed: Duration) -> Result<AnswerFeedback, QuizError> {
    if elapsed > self.limit {
      return self.record(None);
    }
    self.record(Some(given))
  }

  /// The countdown ran out without an answer.
  pub fn expire_question(&mut self) -> Result<AnswerFeedback, QuizError> {
    self.record(None)
  }

  /// Leave the quiz from any phase; returns the quiz that was open, if any.
  pub fn close(&mut self) -> Option<QuizId> {
    let id = match &self.phase {
      QuizPhase::Idle => None,
      QuizPhase::ConfirmationPending(q) => Some(q.id.clone()),
      QuizPhase::InProgress(run) => Some(run.quiz.id.clone()),
      QuizPhase::Complete(o) => Some(o.quiz_id.clone()),
    };
    self.phase = QuizPhase::Idle;
    id
  }

  fn record(&mut self, given: Option<&str>) -> Result<AnswerFeedback, QuizError> {
    let QuizPhase::InProgress(run) = &mut self.phase else {
      return Err(QuizError::NotInProgress);
    };
    let question = run.quiz.questions.get(run.index).ok_or(QuizError::NotInProgress)?;
    let correct = given.is_some_and(|g| check_answer(question, g));
    let timed_out = given.is_none();
    let expected = question.answer.clone();
    run.answers.push(AnswerRecord {
      question_id: question.id,
      given: given.map(str::to_string),
      correct,
      timed_out,
    });
    run.index += 1;
    debug!(target: "quiz", quiz_id = %run.quiz.id, index = run.index, correct, timed_out, "Answer recorded");

    if run.index < run.quiz.questions.len() {
      let run = run.clone();
      return Ok(AnswerFeedback { correct, timed_out, expected, next: self.view(&run), outcome: None });
    }

    let outcome = score(run, self.pass_threshold);
    info!(target: "quiz", quiz_id = %outcome.quiz_id, run_id = %run.run_id, percent = outcome.percent, passed = outcome.passed, "Quiz complete");
    self.phase = QuizPhase::Complete(outcome.clone());
    Ok(AnswerFeedback { correct, timed_out, expected, next: None, outcome: Some(outcome) })
  }

  fn view(&self, run: &QuizRun) -> Option<QuestionView> {
    let q = run.quiz.questions.get(run.index)?;
    Some(QuestionView {
      quiz_id: run.quiz.id.clone(),
      number: run.index + 1,
      total: run.quiz.questions.len(),
      question: q.question.clone(),
      kind: q.kind,
      options: q.options.clone(),
      seconds: self.limit.as_secs(),
    })
  }
}

/// Multiple choice: the option text or its 1-based number, case-insensitive.
/// Fill in the blank: the expected token appears in what was typed.
pub fn check_answer(question: &Question, given: &str) -> bool {
  let given = given.trim();
  if given.is_empty() {
    return false;
  }
  let expected = question.answer.trim().to_lowercase();
  match question.kind {
    QuestionKind::MultipleChoice => {
      let options = question.options.as_deref().unwrap_or_default();
      // Option text wins over numbering when an option is itself a number.
      let picked = if options.iter().any(|o| o.trim().eq_ignore_ascii_case(given)) {
        given
      } else {
        given
          .parse::<usize>()
          .ok()
          .and_then(|n| n.checked_sub(1))
          .and_then(|i| options.get(i))
          .map(|o| o.as_str())
          .unwrap_or(given)
      };
      picked.trim().to_lowercase() == expected
    }
    QuestionKind::FillInBlank => given.to_lowercase().contains(&expected),
  }
}

fn score(run: &QuizRun, pass_threshold: u32) -> QuizOutcome {
  let total = run.quiz.questions.len() as u32;
  let correct = run.answers.iter().filter(|a| a.correct).count() as u32;
  let percent = if total == 0 { 0 } else { ((correct as f32 / total as f32) * 100.0).round() as u32 };
  QuizOutcome {
    quiz_id: run.quiz.id.clone(),
    topic: run.quiz.topic.clone(),
    correct,
    total,
    percent,
    passed: percent >= pass_threshold,
    badge_id: run.quiz.badge_id.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;

  fn python_quiz() -> QuizDefinition {
    Catalog::builtin().quiz("python").cloned().expect("python quiz")
  }

  fn flow() -> QuizFlow {
    QuizFlow::new(Duration::from_secs(30), 60)
  }

  const FAST: Duration = Duration::from_secs(1);

  #[test]
  fn full_run_passes_with_correct_answers() {
    let mut f = flow();
    f.request(&python_quiz()).expect("request");
    assert!(matches!(f.phase(), QuizPhase::ConfirmationPending(_)));

    let first = f.confirm().expect("confirm");
    assert_eq!((first.number, first.total), (1, 3));
    assert!(f.is_in_progress());

    let fb = f.submit_answer("def", FAST).expect("answer 1");
    assert!(fb.correct);
    assert_eq!(fb.next.as_ref().map(|q| q.number), Some(2));

    // Options are "2", "3", "4": the text "3" is an option, not option number 3.
    let fb = f.submit_answer("3", FAST).expect("answer 2");
    assert!(fb.correct);

    let fb = f.submit_answer("I think it's print()", FAST).expect("answer 3");
    assert!(fb.correct);
    let outcome = fb.outcome.expect("outcome");
    assert_eq!((outcome.correct, outcome.total, outcome.percent), (3, 3, 100));
    assert!(outcome.passed);
    assert_eq!(outcome.badge_id, "python_novice");
    assert!(matches!(f.phase(), QuizPhase::Complete(_)));
  }

  #[test]
  fn late_and_expired_answers_count_as_timeouts() {
    let mut f = flow();
    f.request(&python_quiz()).expect("request");
    f.confirm().expect("confirm");

    let fb = f.submit_answer("def", Duration::from_secs(31)).expect("late");
    assert!(fb.timed_out && !fb.correct);
    let fb = f.expire_question().expect("expire");
    assert!(fb.timed_out);
    let fb = f.submit_answer("print", FAST).expect("last");
    let outcome = fb.outcome.expect("outcome");
    assert_eq!((outcome.correct, outcome.percent), (1, 33));
    assert!(!outcome.passed);
  }

  #[test]
  fn only_one_active_quiz() {
    let mut f = flow();
    let quiz = python_quiz();
    f.request(&quiz).expect("request");
    f.confirm().expect("confirm");
    assert_eq!(f.request(&quiz), Err(QuizError::AlreadyActive("python".into())));
    assert_eq!(f.close().as_deref(), Some("python"));
    assert!(f.request(&quiz).is_ok());
  }

  #[test]
  fn transitions_out_of_order_are_rejected() {
    let mut f = flow();
    assert_eq!(f.confirm().unwrap_err(), QuizError::NothingPending);
    assert_eq!(f.decline().unwrap_err(), QuizError::NothingPending);
    assert_eq!(f.submit_answer("x", FAST).unwrap_err(), QuizError::NotInProgress);
    assert_eq!(f.expire_question().unwrap_err(), QuizError::NotInProgress);
    assert_eq!(f.close(), None);

    f.request(&python_quiz()).expect("request");
    assert_eq!(f.decline().as_deref(), Ok("python"));
    assert!(matches!(f.phase(), QuizPhase::Idle));
  }

  #[test]
  fn multiple_choice_checks() {
    let q = Question {
      id: 1,
      question: "Pick".into(),
      options: Some(vec!["Alpha".into(), "Beta".into()]),
      answer: "Beta".into(),
      kind: QuestionKind::MultipleChoice,
    };
    assert!(check_answer(&q, "beta"));
    assert!(check_answer(&q, " 2 "));
    assert!(!check_answer(&q, "1"));
    assert!(!check_answer(&q, "3"));
    assert!(!check_answer(&q, "0"));
    assert!(!check_answer(&q, ""));
    assert!(!check_answer(&q, "Beta minus"));

    let numeric = Question {
      id: 2,
      question: "len([1, 2, 3])?".into(),
      options: Some(vec!["2".into(), "3".into(), "4".into()]),
      answer: "3".into(),
      kind: QuestionKind::MultipleChoice,
    };
    assert!(check_answer(&numeric, "3"));
    assert!(!check_answer(&numeric, "2"));
  }

  #[test]
  fn fill_in_blank_checks() {
    let q = Question { id: 1, question: "Tag?".into(), options: None, answer: "h1".into(), kind: QuestionKind::FillInBlank };
    assert!(check_answer(&q, "H1"));
    assert!(check_answer(&q, "<h1>"));
    assert!(!check_answer(&q, "h2"));
    assert!(!check_answer(&q, "   "));
  }

  #[test]
  fn gate_suppresses_identical_consecutive_prompts() {
    let mut gate = QuizRequestGate::default();
    assert!(gate.admit("Quiz me on Python"));
    assert!(!gate.admit("quiz me on python  "));
    assert!(gate.admit("quiz me on web development"));
    assert!(gate.admit("Quiz me on Python"));
    gate.reset();
    assert!(gate.admit("Quiz me on Python"));
  }
}
