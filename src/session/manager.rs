//! Owns the active exercise session and runs its LLM requests.
//!
//! Every session gets a fresh generation number. Requests are issued with the
//! generation they belong to, and a result whose generation no longer matches
//! the active session (because the learner exited or started another
//! exercise) is dropped without touching any state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config;
use crate::domain::{ExerciseKind, ReadingExercise, WritingFeedback, WritingScenario};
use crate::llm::{self, GenerationRequest, LlmClient};
use crate::prompts::PromptComposer;
use crate::session::{
    ExerciseSession, ReadingPhase, ReadingSession, SessionError, SessionState, WritingPhase,
    WritingSession,
};

/// Upward contract towards the view layer.
///
/// Each session ends with exactly one `on_complete` or `on_exit`. `on_error`
/// may fire any number of times before that.
pub trait SessionListener: Send + Sync {
    fn on_complete(&self, kind: ExerciseKind, score: u8);
    fn on_exit(&self, kind: ExerciseKind);
    fn on_error(&self, message: &str);
}

/// Content request issued when a session enters Loading
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    pub generation: u64,
    pub kind: ExerciseKind,
    pub request: GenerationRequest,
}

/// Evaluation request issued when a draft is submitted
#[derive(Debug, Clone, PartialEq)]
pub struct GradingTicket {
    pub generation: u64,
    pub request: GenerationRequest,
}

enum Loaded {
    Reading(ReadingExercise),
    Writing(WritingScenario),
}

pub struct SessionManager {
    llm: Arc<dyn LlmClient>,
    composer: PromptComposer,
    listener: Arc<dyn SessionListener>,
    rng: Mutex<StdRng>,
    review_delay: Duration,
    generation: AtomicU64,
    active: Mutex<Option<ExerciseSession>>,
}

impl SessionManager {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        composer: PromptComposer,
        listener: Arc<dyn SessionListener>,
    ) -> Self {
        Self {
            llm,
            composer,
            listener,
            rng: Mutex::new(StdRng::from_os_rng()),
            review_delay: Duration::from_secs(config::REVIEW_DELAY_SECS),
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    /// Use a fixed random source for prompt variables.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_review_delay(mut self, delay: Duration) -> Self {
        self.review_delay = delay;
        self
    }

    pub fn review_delay(&self) -> Duration {
        self.review_delay
    }

    fn slot(&self) -> MutexGuard<'_, Option<ExerciseSession>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the active session, if any
    pub fn current(&self) -> Option<ExerciseSession> {
        self.slot().clone()
    }

    // ==================== Loading ====================

    /// Replace any active session with a new one in Loading and return the
    /// request to run for it.
    pub fn begin(&self, kind: ExerciseKind, level: u8) -> LoadTicket {
        let (ticket, replaced) = self.enter_loading(kind, level);
        if let Some(old) = replaced {
            tracing::debug!(
                "Session {} replaced by session {}",
                old.generation,
                ticket.generation
            );
            self.listener.on_exit(old.kind);
        }
        tracing::info!(
            "Starting {} session {} at level {}",
            kind,
            ticket.generation,
            level
        );
        ticket
    }

    fn enter_loading(
        &self,
        kind: ExerciseKind,
        level: u8,
    ) -> (LoadTicket, Option<ExerciseSession>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            match kind {
                ExerciseKind::Reading => self.composer.reading_exercise(level, &mut *rng),
                ExerciseKind::Writing => self.composer.writing_scenario(level, &mut *rng),
            }
        };

        let replaced = self.slot().replace(ExerciseSession {
            generation,
            kind,
            level,
            state: SessionState::Loading,
        });
        let ticket = LoadTicket {
            generation,
            kind,
            request,
        };
        (ticket, replaced)
    }

    /// Run the content request for `ticket` and apply the result if its
    /// session is still active.
    pub async fn load(&self, ticket: LoadTicket) {
        let result = match ticket.kind {
            ExerciseKind::Reading => {
                llm::generate_structured::<ReadingExercise>(self.llm.as_ref(), &ticket.request)
                    .await
                    .map(Loaded::Reading)
            }
            ExerciseKind::Writing => {
                llm::generate_structured::<WritingScenario>(self.llm.as_ref(), &ticket.request)
                    .await
                    .map(Loaded::Writing)
            }
        };

        let error_message = {
            let mut slot = self.slot();
            let session = match slot.as_mut() {
                Some(s) if s.generation == ticket.generation => s,
                other => {
                    tracing::debug!(
                        "Discarding content for session {} (active: {:?})",
                        ticket.generation,
                        other.map(|s| s.generation)
                    );
                    return;
                }
            };
            if !matches!(session.state, SessionState::Loading) {
                return;
            }

            match result {
                Ok(Loaded::Reading(exercise)) => {
                    session.state = SessionState::Reading(ReadingSession::new(exercise));
                    None
                }
                Ok(Loaded::Writing(scenario)) => {
                    session.state = SessionState::Writing(WritingSession::new(scenario));
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to generate {} exercise with {}: {}",
                        ticket.kind,
                        self.llm.model(),
                        e
                    );
                    let message = format!(
                        "Could not generate a {} exercise. Try again or go back to the dashboard.",
                        ticket.kind
                    );
                    session.state = SessionState::Failed {
                        message: message.clone(),
                    };
                    Some(message)
                }
            }
        };

        if let Some(message) = error_message {
            self.listener.on_error(&message);
        }
    }

    /// Begin a session and load it in the background. Returns its generation.
    pub fn start(self: &Arc<Self>, kind: ExerciseKind, level: u8) -> u64 {
        let ticket = self.begin(kind, level);
        self.spawn_load(ticket)
    }

    fn spawn_load(self: &Arc<Self>, ticket: LoadTicket) -> u64 {
        let generation = ticket.generation;
        let this = Arc::clone(self);
        tokio::spawn(async move { this.load(ticket).await });
        generation
    }

    /// Re-enter Loading after a failed load. The session keeps its kind and
    /// level but gets a new generation.
    pub fn retry(self: &Arc<Self>) -> Result<u64, SessionError> {
        let (kind, level) = {
            let slot = self.slot();
            let session = slot.as_ref().ok_or(SessionError::NoActiveSession)?;
            if !matches!(session.state, SessionState::Failed { .. }) {
                return Err(SessionError::InvalidPhase { action: "retry" });
            }
            (session.kind, session.level)
        };
        let (ticket, _) = self.enter_loading(kind, level);
        tracing::info!("Retrying {} session as {}", kind, ticket.generation);
        Ok(self.spawn_load(ticket))
    }

    /// Tear down the active session. Pending results for it are discarded.
    pub fn exit(&self) {
        let taken = self.slot().take();
        if let Some(session) = taken {
            tracing::info!("Exited {} session {}", session.kind, session.generation);
            self.listener.on_exit(session.kind);
        }
    }

    // ==================== Reading ====================

    fn with_reading<T>(
        &self,
        f: impl FnOnce(&mut ReadingSession, u64) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut slot = self.slot();
        let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
        let generation = session.generation;
        match &mut session.state {
            SessionState::Reading(reading) => f(reading, generation),
            SessionState::Writing(_) => Err(SessionError::WrongKind(ExerciseKind::Writing)),
            _ => Err(SessionError::InvalidPhase {
                action: "answer questions",
            }),
        }
    }

    pub fn select_answer(&self, question: usize, option: usize) -> Result<(), SessionError> {
        self.with_reading(|reading, _| reading.select(question, option))
    }

    /// Lock the answers. Returns the session generation and the score.
    pub fn lock_answers(&self) -> Result<(u64, u8), SessionError> {
        self.with_reading(|reading, generation| {
            let score = reading.submit()?;
            tracing::info!("Reading session {} submitted: score {}", generation, score);
            Ok((generation, score))
        })
    }

    /// Lock the answers and finish the session after the review delay.
    pub fn submit_reading(self: &Arc<Self>) -> Result<u8, SessionError> {
        let (generation, score) = self.lock_answers()?;
        let this = Arc::clone(self);
        let delay = self.review_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.finish_reading(generation);
        });
        Ok(score)
    }

    /// Finish a submitted reading session and report its score. Returns the
    /// score, or `None` if the session is gone or not submitted.
    pub fn finish_reading(&self, generation: u64) -> Option<u8> {
        let score = {
            let mut slot = self.slot();
            let session = slot.as_mut().filter(|s| s.generation == generation)?;
            let SessionState::Reading(reading) = &mut session.state else {
                return None;
            };
            if !matches!(reading.phase(), ReadingPhase::Submitted { .. }) {
                return None;
            }
            let score = reading.finish().ok()?;
            slot.take();
            score
        };

        self.listener.on_complete(ExerciseKind::Reading, score);
        Some(score)
    }

    // ==================== Writing ====================

    /// Save `draft`, lock it, and return the evaluation request.
    pub fn begin_grading(&self, draft: &str) -> Result<GradingTicket, SessionError> {
        let mut slot = self.slot();
        let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
        let generation = session.generation;
        let level = session.level;
        let writing = match &mut session.state {
            SessionState::Writing(writing) => writing,
            SessionState::Reading(_) => return Err(SessionError::WrongKind(ExerciseKind::Reading)),
            _ => return Err(SessionError::InvalidPhase { action: "submit" }),
        };

        writing.edit(draft)?;
        writing.begin_grading()?;
        let request = self
            .composer
            .writing_evaluation(writing.scenario(), level, writing.draft());

        tracing::info!("Grading draft for writing session {}", generation);
        Ok(GradingTicket {
            generation,
            request,
        })
    }

    /// Run the evaluation request and apply the feedback if the session is
    /// still active. A failure unlocks the draft.
    pub async fn grade(&self, ticket: GradingTicket) {
        let result =
            llm::generate_structured::<WritingFeedback>(self.llm.as_ref(), &ticket.request).await;

        let failed = {
            let mut slot = self.slot();
            let writing = match slot.as_mut() {
                Some(ExerciseSession {
                    generation,
                    state: SessionState::Writing(writing),
                    ..
                }) if *generation == ticket.generation => writing,
                _ => {
                    tracing::debug!("Discarding feedback for session {}", ticket.generation);
                    return;
                }
            };
            if writing.phase() != &WritingPhase::Grading {
                return;
            }

            match result {
                Ok(feedback) => {
                    tracing::info!(
                        "Writing session {} graded: score {}",
                        ticket.generation,
                        feedback.score
                    );
                    writing.graded(feedback).is_err()
                }
                Err(e) => {
                    tracing::warn!("Failed to evaluate draft with {}: {}", self.llm.model(), e);
                    writing.grading_failed();
                    true
                }
            }
        };

        if failed {
            self.listener
                .on_error("Could not evaluate your text. Your draft was kept, please submit again.");
        }
    }

    /// Submit `draft` for grading in the background.
    pub fn submit_writing(self: &Arc<Self>, draft: &str) -> Result<(), SessionError> {
        let ticket = self.begin_grading(draft)?;
        let this = Arc::clone(self);
        tokio::spawn(async move { this.grade(ticket).await });
        Ok(())
    }

    /// Accept the feedback, end the session and report its score.
    pub fn finalize_writing(&self) -> Result<u8, SessionError> {
        let score = {
            let mut slot = self.slot();
            let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
            let score = match &mut session.state {
                SessionState::Writing(writing) => writing.finalize()?,
                SessionState::Reading(_) => {
                    return Err(SessionError::WrongKind(ExerciseKind::Reading))
                }
                _ => return Err(SessionError::InvalidPhase { action: "finish" }),
            };
            slot.take();
            score
        };

        self.listener.on_complete(ExerciseKind::Writing, score);
        Ok(score)
    }
}
