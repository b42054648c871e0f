pub mod dashboard;
pub mod session;
pub mod templates;

use askama::Template;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::paths;
use crate::state::AppState;

use templates::NoticeView;

pub use dashboard::{api_progress, dismiss_notice, index};
pub use session::{
  exit, finish_writing, retry, show_session, start_reading, start_writing, submit_reading,
  submit_writing,
};

/// All routes, with request tracing and the static directory mounted.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/reading/start", post(start_reading))
    .route("/reading/submit", post(submit_reading))
    .route("/writing/start", post(start_writing))
    .route("/writing/submit", post(submit_writing))
    .route("/writing/finish", post(finish_writing))
    .route("/session", get(show_session))
    .route("/session/retry", post(retry))
    .route("/session/exit", post(exit))
    .route("/notices/dismiss", post(dismiss_notice))
    .route("/api/progress", get(api_progress))
    .nest_service("/static", ServeDir::new(paths::STATIC_DIR))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub(crate) fn active_notices(state: &AppState) -> Vec<NoticeView> {
  state.notices.active().into_iter().map(NoticeView::from).collect()
}

pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
  match template.render() {
    Ok(html) => Html(html),
    Err(e) => {
      tracing::error!("Template render failed: {}", e);
      Html(String::new())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::StatusCode;
  use axum_test::TestServer;
  use std::sync::Arc;
  use std::time::Duration;

  use crate::domain::{ExerciseKind, ProgressRecord};
  use crate::llm::mock::{fixtures, ScriptedLlmClient};
  use crate::llm::LlmError;
  use crate::notice::Notices;
  use crate::prompts::PromptComposer;
  use crate::session::{SessionManager, SessionPhase};
  use crate::state::AppListener;
  use crate::store::ProgressStore;
  use crate::testing::TestEnv;

  struct Harness {
    server: TestServer,
    state: AppState,
    llm: Arc<ScriptedLlmClient>,
    _env: TestEnv,
  }

  fn harness() -> Harness {
    let env = TestEnv::new().unwrap();
    let progress = Arc::new(ProgressStore::load(Arc::new(env.store.clone())));
    let notices = Arc::new(Notices::new(chrono::Duration::seconds(60)));
    let llm = Arc::new(ScriptedLlmClient::new());
    let listener = Arc::new(AppListener::new(progress.clone(), notices.clone()));
    let sessions = Arc::new(
      SessionManager::new(llm.clone(), PromptComposer::new("Spanish"), listener)
        .with_review_delay(Duration::from_millis(100)),
    );
    let state = AppState::from_parts(progress, sessions, notices);
    let server = TestServer::new(router(state.clone())).unwrap();

    Harness {
      server,
      state,
      llm,
      _env: env,
    }
  }

  impl Harness {
    async fn wait_for(&self, phase: Option<SessionPhase>) {
      for _ in 0..200 {
        if self.state.sessions.current().map(|s| s.phase()) == phase {
          return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
      }
      panic!("session never reached {:?}", phase);
    }

    async fn progress(&self) -> ProgressRecord {
      self.server.get("/api/progress").await.json::<ProgressRecord>()
    }
  }

  fn location(response: &axum_test::TestResponse) -> String {
    response.header("location").to_str().unwrap().to_string()
  }

  #[tokio::test]
  async fn test_dashboard_shows_fresh_progress() {
    let h = harness();
    let response = h.server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Level 1"));
    assert!(html.contains("Beginner"));
    assert!(html.contains("0 / 100 XP"));
  }

  #[tokio::test]
  async fn test_session_page_without_session_redirects_home() {
    let h = harness();
    let response = h.server.get("/session").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
  }

  #[tokio::test]
  async fn test_reading_session_end_to_end() {
    let h = harness();
    h.llm.push_ok(fixtures::READING_EXERCISE);

    let response = h.server.post("/reading/start").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/session");
    h.wait_for(Some(SessionPhase::Ready)).await;

    let page = h.server.get("/session").await.text();
    assert!(page.contains("Rollback of release 4.2"));
    assert!(page.contains("Why was 4.2 rolled back?"));

    let response = h
      .server
      .post("/reading/submit")
      .form(&[("q0", "0"), ("q1", "1"), ("q2", "0")])
      .await;
    assert_eq!(location(&response), "/session");

    let page = h.server.get("/session").await.text();
    assert!(page.contains("2 of 3 correct"));
    assert!(page.contains("A taxa de erros triplicou."));

    h.wait_for(None).await;
    let progress = h.progress().await;
    assert_eq!(progress.history.len(), 1);
    assert_eq!(progress.history[0].score, 67);
    assert_eq!(progress.history[0].kind, ExerciseKind::Reading);
    // 67 * 1.5 rounds to 101
    assert_eq!(progress.level, 2);
    assert_eq!(progress.experience, 1);

    let dashboard = h.server.get("/").await.text();
    assert!(dashboard.contains("Level up! You reached level 2"));
  }

  #[tokio::test]
  async fn test_unanswered_reading_is_rejected() {
    let h = harness();
    h.llm.push_ok(fixtures::READING_EXERCISE);
    h.server.post("/reading/start").await;
    h.wait_for(Some(SessionPhase::Ready)).await;

    let response = h.server.post("/reading/submit").form(&[("q0", "0")]).await;
    assert_eq!(location(&response), "/session");
    h.wait_for(Some(SessionPhase::Ready)).await;

    let page = h.server.get("/session").await.text();
    assert!(page.contains("Answer every question before submitting"));
  }

  #[tokio::test]
  async fn test_writing_session_end_to_end() {
    let h = harness();
    h.llm.push_ok(fixtures::WRITING_SCENARIO);
    h.llm.push_ok(fixtures::WRITING_FEEDBACK);

    h.server.post("/writing/start").await;
    h.wait_for(Some(SessionPhase::Ready)).await;

    let response = h
      .server
      .post("/writing/submit")
      .form(&[("draft", "Hi Sam, the deploy failed and I am rolling it back now.")])
      .await;
    assert_eq!(location(&response), "/session");
    h.wait_for(Some(SessionPhase::Graded)).await;

    let page = h.server.get("/session").await.text();
    assert!(page.contains("78"));

    let response = h.server.post("/writing/finish").await;
    assert_eq!(location(&response), "/");
    assert!(h.state.sessions.current().is_none());

    let progress = h.progress().await;
    assert_eq!(progress.history.len(), 1);
    assert_eq!(progress.history[0].score, 78);
    assert_eq!(progress.level, 2);
    assert_eq!(progress.experience, 17);
  }

  #[tokio::test]
  async fn test_short_draft_keeps_session_ready() {
    let h = harness();
    h.llm.push_ok(fixtures::WRITING_SCENARIO);
    h.server.post("/writing/start").await;
    h.wait_for(Some(SessionPhase::Ready)).await;

    h.server.post("/writing/submit").form(&[("draft", "short")]).await;

    let page = h.server.get("/session").await.text();
    assert!(page.contains("Write at least 10 characters"));
    assert!(page.contains("short"));
    assert_eq!(h.llm.requests().len(), 1);
  }

  #[tokio::test]
  async fn test_failed_load_then_retry() {
    let h = harness();
    h.llm.push_err(LlmError::MissingApiKey);

    h.server.post("/reading/start").await;
    h.wait_for(Some(SessionPhase::Failed)).await;

    let page = h.server.get("/session").await.text();
    assert!(page.contains("Could not generate a reading exercise"));
    assert!(page.contains("/session/retry"));

    h.llm.push_ok(fixtures::READING_EXERCISE);
    let response = h.server.post("/session/retry").await;
    assert_eq!(location(&response), "/session");
    h.wait_for(Some(SessionPhase::Ready)).await;
  }

  #[tokio::test]
  async fn test_exit_discards_session_without_progress() {
    let h = harness();
    h.llm.push_ok(fixtures::READING_EXERCISE);
    h.server.post("/reading/start").await;
    h.wait_for(Some(SessionPhase::Ready)).await;

    let response = h.server.post("/session/exit").await;
    assert_eq!(location(&response), "/");
    assert!(h.state.sessions.current().is_none());
    assert!(h.progress().await.history.is_empty());
  }

  #[tokio::test]
  async fn test_dismiss_notice() {
    let h = harness();
    let id = h.state.notices.error("Something went wrong");
    assert!(h.server.get("/").await.text().contains("Something went wrong"));

    let id = id.to_string();
    let response = h
      .server
      .post("/notices/dismiss")
      .form(&[("id", id.as_str()), ("back", "/")])
      .await;
    assert_eq!(location(&response), "/");
    assert!(!h.server.get("/").await.text().contains("Something went wrong"));
  }
}
