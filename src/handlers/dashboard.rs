use askama::Template;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::{Form, Json};
use serde::Deserialize;

use crate::config;
use crate::domain::ProgressRecord;
use crate::progression::{prompt_context_of, tier_of};
use crate::session::SessionPhase;
use crate::state::AppState;

use super::templates::{HistoryRow, IndexTemplate};
use super::{active_notices, render};

pub async fn index(State(state): State<AppState>) -> Html<String> {
  let progress = state.progress.get();

  let history = progress
    .recent_history(config::HISTORY_DISPLAY_LIMIT)
    .map(|record| HistoryRow {
      kind: record.kind.label(),
      score: record.score,
      level: record.level_at_completion,
      completed_at: record.completed_at.format("%Y-%m-%d %H:%M").to_string(),
    })
    .collect();

  let session_label = match state.sessions.current() {
    Some(session) => {
      let phase = match session.phase() {
        SessionPhase::Loading => "loading",
        SessionPhase::Failed => "failed",
        SessionPhase::Submitted => "awaiting results",
        SessionPhase::Graded => "graded",
        SessionPhase::Ready | SessionPhase::Finished => "in progress",
      };
      format!("{} exercise ({})", session.kind.label(), phase)
    }
    None => String::new(),
  };

  let template = IndexTemplate {
    notices: active_notices(&state),
    back: "/",
    level: progress.level,
    max_level: config::MAX_LEVEL,
    tier: tier_of(progress.level).as_str(),
    context: prompt_context_of(progress.level),
    experience: progress.experience,
    threshold: progress.experience_to_next_level,
    percentage: progress.percentage(),
    is_max_level: progress.is_max_level(),
    total_completed: progress.history.len(),
    history,
    has_session: !session_label.is_empty(),
    session_label,
  };

  render(&template)
}

/// Current progress record as JSON
pub async fn api_progress(State(state): State<AppState>) -> Json<ProgressRecord> {
  Json(state.progress.get())
}

#[derive(Deserialize)]
pub struct DismissForm {
  pub id: u64,
  #[serde(default)]
  pub back: Option<String>,
}

pub async fn dismiss_notice(
  State(state): State<AppState>,
  Form(form): Form<DismissForm>,
) -> Redirect {
  state.notices.dismiss(form.id);
  match form.back.as_deref() {
    Some("/session") => Redirect::to("/session"),
    _ => Redirect::to("/"),
  }
}
