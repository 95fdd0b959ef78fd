//! Core behaviors shared by both frontends.
//!
//! This includes:
//!   - Chat turns: classify, award XP and skill, build a canned reply with
//!     resource links, and offer a quiz when asked for one
//!   - Quiz commands: request, confirm, decline, answer, expire, close
//!   - Read-only views: stats, resources, quiz list
//!   - Resetting saved progress

use chrono::Local;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::domain::{BadgeDefinition, ClassificationResult, Difficulty, Intent, LearningResource, QuizDefinition, QuizId};
use crate::error::{QuizError, StoreError};
use crate::gamification::{Award, Progress};
use crate::matcher::MatchTier;
use crate::quiz::{AnswerFeedback, QuestionView, QuizOutcome};
use crate::state::{AppState, Session};
use crate::util::{fill_template, pick, trunc_for_log};

/// Phrases that route a chat message to the quiz matcher.
const QUIZ_START_PHRASES: &[&str] = &["quiz", "test me", "test my", "assess", "exam", "challenge me"];

/// Resource links appended to a topical reply.
const MAX_REPLY_RESOURCES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
  pub reply: String,
  pub classification: ClassificationResult,
  pub xp_gained: u32,
  pub level_up: Option<u32>,
  pub new_badges: Vec<BadgeDefinition>,
  pub quiz_offer: Option<QuizOffer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOffer {
  pub quiz_id: QuizId,
  pub topic: String,
  pub difficulty: Difficulty,
  pub questions: usize,
  /// Matcher tier, for offers raised from a chat message.
  pub tier: Option<MatchTier>,
  pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
  pub feedback: AnswerFeedback,
  pub xp_gained: u32,
  pub level_up: Option<u32>,
  pub new_badges: Vec<BadgeDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
  pub progress: Progress,
  /// XP collected inside the current level, and the size of a level.
  pub level_xp: u32,
  pub level_size: u32,
  pub badges: Vec<BadgeDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
  pub id: QuizId,
  pub topic: String,
  pub difficulty: Difficulty,
  pub questions: usize,
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn handle_chat_message(state: &AppState, text: &str) -> ChatTurn {
  let text = text.trim();
  let classification = state.classifier.detect(text);
  debug!(target: "chat", intent = %classification.intent, topic = ?classification.topic, text = %trunc_for_log(text, 80), "Classified message");

  let mut session = state.session.write().await;
  if let Some(topic) = &classification.topic {
    let (lo, hi) = skill_bump_range(state);
    let amount = rand::thread_rng().gen_range(lo..=hi);
    let skill = session.progress.bump_skill(topic, amount);
    debug!(target: "chat", %topic, amount, skill, "Skill bumped");
  }
  let award = session.progress.record_chat_turn(&classification, Local::now().date_naive(), &state.settings);
  session.persist();

  let mut reply = compose_reply(state, &classification);
  let mut quiz_offer = None;
  let lower = text.to_lowercase();
  if QUIZ_START_PHRASES.iter().any(|p| lower.contains(p)) && !session.quiz.is_in_progress() && session.gate.admit(text) {
    match offer_from_prompt(state, &mut session, text) {
      Ok(offer) => quiz_offer = Some(offer),
      Err(QuizError::UnknownQuiz(_)) => {
        reply.push_str("\n\n");
        reply.push_str(&state.responses.quiz_not_found);
      }
      Err(e) => warn!(target: "quiz", error = %e, "Quiz offer rejected"),
    }
  }

  info!(target: "chat", intent = %classification.intent, xp_gained = award.xp_gained, offered = quiz_offer.is_some(), "Chat turn handled");
  ChatTurn {
    reply,
    classification,
    xp_gained: award.xp_gained,
    level_up: award.level_up,
    new_badges: badge_defs(state, &award.new_badges),
    quiz_offer,
  }
}

/// Offer a quiz by exact id, or by running the matcher on free text. Bypasses
/// the repeat gate: an explicit request is always honored.
#[instrument(level = "info", skip(state))]
pub async fn request_quiz(state: &AppState, prompt_or_id: &str) -> Result<QuizOffer, QuizError> {
  let mut session = state.session.write().await;
  let id = prompt_or_id.trim().to_lowercase();
  if let Some(quiz) = state.catalog.quiz(&id) {
    session.quiz.request(quiz)?;
    return Ok(offer(state, quiz, None));
  }
  let id = state
    .matcher
    .find_best_match(prompt_or_id)
    .ok_or_else(|| QuizError::UnknownQuiz(prompt_or_id.trim().to_string()))?;
  let quiz = state.catalog.quiz(&id).ok_or(QuizError::UnknownQuiz(id.clone()))?;
  session.quiz.request(quiz)?;
  Ok(offer(state, quiz, None))
}

#[instrument(level = "info", skip(state))]
pub async fn confirm_quiz(state: &AppState) -> Result<QuestionView, QuizError> {
  let mut session = state.session.write().await;
  let view = session.quiz.confirm()?;
  session.question_started = Some(tokio::time::Instant::now());
  Ok(view)
}

#[instrument(level = "info", skip(state))]
pub async fn decline_quiz(state: &AppState) -> Result<QuizId, QuizError> {
  let mut session = state.session.write().await;
  let id = session.quiz.decline()?;
  session.gate.reset();
  info!(target: "quiz", quiz_id = %id, "Quiz declined");
  Ok(id)
}

/// Answer the current question; elapsed time is measured from when the
/// question was shown.
#[instrument(level = "info", skip(state, answer), fields(answer_len = answer.len()))]
pub async fn submit_answer(state: &AppState, answer: &str) -> Result<AnswerResult, QuizError> {
  let mut session = state.session.write().await;
  let elapsed = session.elapsed_on_question();
  let feedback = session.quiz.submit_answer(answer, elapsed)?;
  Ok(after_answer(state, &mut session, feedback))
}

#[instrument(level = "info", skip(state))]
pub async fn expire_question(state: &AppState) -> Result<AnswerResult, QuizError> {
  let mut session = state.session.write().await;
  let feedback = session.quiz.expire_question()?;
  Ok(after_answer(state, &mut session, feedback))
}

#[instrument(level = "info", skip(state))]
pub async fn close_quiz(state: &AppState) -> Option<QuizId> {
  let mut session = state.session.write().await;
  session.gate.reset();
  session.question_started = None;
  let closed = session.quiz.close();
  if let Some(id) = &closed {
    info!(target: "quiz", quiz_id = %id, "Quiz closed");
  }
  closed
}

pub async fn current_question(state: &AppState) -> Option<QuestionView> {
  state.session.read().await.quiz.current_question()
}

#[instrument(level = "debug", skip(state))]
pub async fn stats(state: &AppState) -> Stats {
  let session = state.session.read().await;
  let progress = session.progress.clone();
  let level_size = state.settings.level_xp.max(1);
  Stats {
    level_xp: progress.xp % level_size,
    level_size,
    badges: badge_defs(state, &progress.badges),
    progress,
  }
}

/// Links for a topic; an empty topic lists everything grouped by topic.
pub fn resources(state: &AppState, topic: &str) -> Vec<LearningResource> {
  let topic = topic.trim();
  if topic.is_empty() {
    return state
      .catalog
      .vocabulary()
      .iter()
      .flat_map(|t| state.catalog.resources_for(t))
      .cloned()
      .collect();
  }
  state.catalog.resources_for(topic).into_iter().cloned().collect()
}

pub fn list_quizzes(state: &AppState) -> Vec<QuizSummary> {
  state
    .catalog
    .quizzes()
    .iter()
    .map(|q| QuizSummary { id: q.id.clone(), topic: q.topic.clone(), difficulty: q.difficulty, questions: q.questions.len() })
    .collect()
}

/// Wipe saved progress and leave any open quiz.
#[instrument(level = "info", skip(state))]
pub async fn reset_progress(state: &AppState) -> Result<(), StoreError> {
  let mut session = state.session.write().await;
  session.quiz.close();
  session.gate.reset();
  session.question_started = None;
  session.progress = Progress::default();
  let Session { progress, store, .. } = &mut *session;
  progress.save(store)?;
  info!(target: "learnquest", "Progress reset");
  Ok(())
}

// -------- helpers --------

fn offer_from_prompt(state: &AppState, session: &mut Session, prompt: &str) -> Result<QuizOffer, QuizError> {
  let m = state
    .matcher
    .best_match(prompt)
    .ok_or_else(|| QuizError::UnknownQuiz(prompt.trim().to_string()))?;
  let quiz = state.catalog.quiz(&m.quiz_id).ok_or_else(|| QuizError::UnknownQuiz(m.quiz_id.clone()))?;
  session.quiz.request(quiz)?;
  Ok(offer(state, quiz, Some(m.tier)))
}

fn offer(state: &AppState, quiz: &QuizDefinition, tier: Option<MatchTier>) -> QuizOffer {
  let count = quiz.questions.len().to_string();
  let text = fill_template(
    &state.responses.quiz_offer,
    &[("topic", &quiz.topic), ("difficulty", quiz.difficulty.label()), ("count", &count)],
  );
  info!(target: "quiz", quiz_id = %quiz.id, ?tier, "Quiz offered");
  QuizOffer {
    quiz_id: quiz.id.clone(),
    topic: quiz.topic.clone(),
    difficulty: quiz.difficulty,
    questions: quiz.questions.len(),
    tier,
    text,
  }
}

fn after_answer(state: &AppState, session: &mut Session, feedback: AnswerFeedback) -> AnswerResult {
  let award = match &feedback.outcome {
    Some(outcome) => finish_quiz(state, session, outcome),
    None => {
      session.question_started = Some(tokio::time::Instant::now());
      Award::default()
    }
  };
  AnswerResult {
    feedback,
    xp_gained: award.xp_gained,
    level_up: award.level_up,
    new_badges: badge_defs(state, &award.new_badges),
  }
}

fn finish_quiz(state: &AppState, session: &mut Session, outcome: &QuizOutcome) -> Award {
  session.question_started = None;
  session.gate.reset();
  let award = session.progress.record_quiz(outcome, &state.settings);
  session.persist();
  award
}

fn compose_reply(state: &AppState, c: &ClassificationResult) -> String {
  let r = &state.responses;
  let templates = match (c.intent, c.topic.is_some()) {
    (Intent::Learning, true) => &r.learning_topic,
    (Intent::Learning, false) => &r.learning_general,
    (Intent::Question, true) => &r.question_topic,
    (Intent::Question, false) => &r.question_general,
    (Intent::TopicExploration, _) => &r.topic_exploration,
    (Intent::GeneralConversation, _) => &r.general_conversation,
  };
  let topic = c.topic.as_deref().unwrap_or("this");
  let mut reply = fill_template(pick(templates), &[("topic", topic)]);

  if let Some(topic) = &c.topic {
    let links = state.catalog.resources_for(topic);
    if !links.is_empty() {
      reply.push_str("\n\nResources:");
      for link in links.into_iter().take(MAX_REPLY_RESOURCES) {
        reply.push_str(&format!("\n- {} ({}): {}", link.title, link.kind.label(), link.url));
      }
    }
  }
  reply
}

fn badge_defs(state: &AppState, ids: &[String]) -> Vec<BadgeDefinition> {
  ids
    .iter()
    .map(|id| {
      state.catalog.badge(id).cloned().unwrap_or_else(|| BadgeDefinition {
        id: id.clone(),
        name: id.clone(),
        description: String::new(),
      })
    })
    .collect()
}

fn skill_bump_range(state: &AppState) -> (u32, u32) {
  let (a, b) = (state.settings.skill_bump_min, state.settings.skill_bump_max);
  (a.min(b), a.max(b))
}
