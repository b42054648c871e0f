//! Application state shared by all handlers.

use std::sync::Arc;

use crate::domain::ExerciseKind;
use crate::llm::LlmClient;
use crate::notice::{NoticeKind, Notices};
use crate::prompts::PromptComposer;
use crate::session::{SessionListener, SessionManager};
use crate::store::ProgressStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Learner progress (single learner)
    pub progress: Arc<ProgressStore>,

    /// The one active exercise session
    pub sessions: Arc<SessionManager>,

    /// Pending notifications for the next rendered page
    pub notices: Arc<Notices>,
}

impl AppState {
    /// Wire the session manager to the progress store through [`AppListener`].
    pub fn new(
        progress: Arc<ProgressStore>,
        notices: Arc<Notices>,
        llm: Arc<dyn LlmClient>,
        composer: PromptComposer,
    ) -> Self {
        let listener = Arc::new(AppListener::new(progress.clone(), notices.clone()));
        let sessions = Arc::new(SessionManager::new(llm, composer, listener));
        Self::from_parts(progress, sessions, notices)
    }

    pub fn from_parts(
        progress: Arc<ProgressStore>,
        sessions: Arc<SessionManager>,
        notices: Arc<Notices>,
    ) -> Self {
        Self {
            progress,
            sessions,
            notices,
        }
    }
}

/// Routes session outcomes to the progress store and the notice queue.
pub struct AppListener {
    progress: Arc<ProgressStore>,
    notices: Arc<Notices>,
}

impl AppListener {
    pub fn new(progress: Arc<ProgressStore>, notices: Arc<Notices>) -> Self {
        Self { progress, notices }
    }
}

impl SessionListener for AppListener {
    fn on_complete(&self, kind: ExerciseKind, score: u8) {
        let before = self.progress.level();
        let after = self.progress.apply_result(score, kind);

        let gained = crate::progression::experience_for_score(score);
        self.notices.push(
            NoticeKind::Success,
            format!("{} exercise complete: score {}, +{} XP", kind.label(), score, gained),
        );
        if after.level > before {
            self.notices.push(
                NoticeKind::Success,
                format!("Level up! You reached level {}", after.level),
            );
        }
    }

    fn on_exit(&self, kind: ExerciseKind) {
        tracing::debug!("Left {} exercise without a score", kind);
    }

    fn on_error(&self, message: &str) {
        self.notices.error(message);
    }
}
