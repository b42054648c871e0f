//! Exercise session pages and actions.
//!
//! Actions redirect back to `/session`, which renders whatever phase the
//! active session is in. Pages for pending phases refresh themselves.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::config;
use crate::domain::ExerciseKind;
use crate::session::{
  ExerciseSession, ReadingPhase, ReadingSession, SessionError, SessionState, WritingPhase,
  WritingSession,
};
use crate::state::AppState;

use super::templates::{
  FailedTemplate, LoadingTemplate, OptionView, QuestionView, ReadingTemplate, WritingTemplate,
};
use super::{active_notices, render};

pub async fn start_reading(State(state): State<AppState>) -> Redirect {
  start(&state, ExerciseKind::Reading)
}

pub async fn start_writing(State(state): State<AppState>) -> Redirect {
  start(&state, ExerciseKind::Writing)
}

fn start(state: &AppState, kind: ExerciseKind) -> Redirect {
  state.sessions.start(kind, state.progress.level());
  Redirect::to("/session")
}

pub async fn show_session(State(state): State<AppState>) -> Response {
  let Some(session) = state.sessions.current() else {
    return Redirect::to("/").into_response();
  };

  let ExerciseSession {
    kind, level, state: session_state, ..
  } = session;

  match session_state {
    SessionState::Loading => render(&LoadingTemplate {
      notices: active_notices(&state),
      back: "/session",
      kind: kind.label(),
      level,
      refresh_secs: config::PENDING_REFRESH_SECS,
    })
    .into_response(),
    SessionState::Failed { message } => render(&FailedTemplate {
      notices: active_notices(&state),
      back: "/session",
      kind: kind.label(),
      message,
    })
    .into_response(),
    SessionState::Reading(reading) => reading_page(&state, level, &reading).into_response(),
    SessionState::Writing(writing) => writing_page(&state, level, &writing).into_response(),
  }
}

fn reading_page(state: &AppState, level: u8, reading: &ReadingSession) -> impl IntoResponse {
  let exercise = reading.exercise();
  let submitted = !matches!(reading.phase(), ReadingPhase::Answering);
  let selections = reading.selections();

  let questions = exercise
    .questions
    .iter()
    .enumerate()
    .map(|(qi, question)| QuestionView {
      index: qi,
      number: qi + 1,
      prompt: question.prompt.clone(),
      options: question
        .options
        .iter()
        .enumerate()
        .map(|(oi, text)| OptionView {
          index: oi,
          text: text.clone(),
          selected: selections.get(qi).copied().flatten() == Some(oi),
          is_answer: submitted && question.correct_option_index == oi,
        })
        .collect(),
      correct: reading.is_correct(qi).unwrap_or(false),
      explanation: question.explanation.clone(),
    })
    .collect();

  let score = match reading.phase() {
    ReadingPhase::Submitted { score } | ReadingPhase::Finished { score } => score,
    ReadingPhase::Answering => 0,
  };

  render(&ReadingTemplate {
    notices: active_notices(state),
    back: "/session",
    level,
    subject: exercise.subject.clone(),
    sender: exercise.sender.clone(),
    body: exercise.body.clone(),
    questions,
    submitted,
    score,
    correct_count: reading.correct_count(),
    refresh_secs: state.sessions.review_delay().as_secs() + 1,
  })
}

fn writing_page(state: &AppState, level: u8, writing: &WritingSession) -> impl IntoResponse {
  let scenario = writing.scenario();
  let feedback = writing.feedback();

  render(&WritingTemplate {
    notices: active_notices(state),
    back: "/session",
    level,
    context: scenario.context.clone(),
    recipient_role: scenario.recipient_role.clone(),
    goal: scenario.goal.clone(),
    key_points: scenario.key_points.clone(),
    draft: writing.draft().to_string(),
    min_chars: config::MIN_DRAFT_CHARS,
    grading: matches!(writing.phase(), WritingPhase::Grading),
    graded: feedback.is_some(),
    refresh_secs: config::PENDING_REFRESH_SECS,
    score: feedback.map(|f| f.score).unwrap_or_default(),
    critique: feedback.map(|f| f.critique.clone()).unwrap_or_default(),
    improved_version: feedback
      .map(|f| f.improved_version.clone())
      .unwrap_or_default(),
    grammar_mistakes: feedback
      .map(|f| f.grammar_mistakes.clone())
      .unwrap_or_default(),
  })
}

/// Push a session error as a notice and go back to the session page.
fn rejected(state: &AppState, error: SessionError) -> Redirect {
  tracing::debug!("Session action rejected: {}", error);
  state.notices.error(error.to_string());
  match error {
    SessionError::NoActiveSession => Redirect::to("/"),
    _ => Redirect::to("/session"),
  }
}

/// Answers arrive as `q{question}={option}`.
fn parse_selections(form: &HashMap<String, String>) -> Vec<(usize, usize)> {
  let mut selections: Vec<(usize, usize)> = form
    .iter()
    .filter_map(|(key, value)| {
      let question = key.strip_prefix('q')?.parse().ok()?;
      let option = value.parse().ok()?;
      Some((question, option))
    })
    .collect();
  selections.sort_unstable();
  selections
}

pub async fn submit_reading(
  State(state): State<AppState>,
  Form(form): Form<HashMap<String, String>>,
) -> Redirect {
  for (question, option) in parse_selections(&form) {
    if let Err(e) = state.sessions.select_answer(question, option) {
      return rejected(&state, e);
    }
  }

  match state.sessions.submit_reading() {
    Ok(_) => Redirect::to("/session"),
    Err(e) => rejected(&state, e),
  }
}

#[derive(Deserialize)]
pub struct DraftForm {
  #[serde(default)]
  pub draft: String,
}

pub async fn submit_writing(
  State(state): State<AppState>,
  Form(form): Form<DraftForm>,
) -> Redirect {
  match state.sessions.submit_writing(&form.draft) {
    Ok(()) => Redirect::to("/session"),
    Err(e) => rejected(&state, e),
  }
}

pub async fn finish_writing(State(state): State<AppState>) -> Redirect {
  match state.sessions.finalize_writing() {
    Ok(_) => Redirect::to("/"),
    Err(e) => rejected(&state, e),
  }
}

pub async fn retry(State(state): State<AppState>) -> Redirect {
  match state.sessions.retry() {
    Ok(_) => Redirect::to("/session"),
    Err(e) => rejected(&state, e),
  }
}

pub async fn exit(State(state): State<AppState>) -> Redirect {
  state.sessions.exit();
  Redirect::to("/")
}
