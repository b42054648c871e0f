//! Exercise sessions.
//!
//! A session moves Loading -> Ready -> Submitted (-> Graded for writing) ->
//! Finished, or Loading -> Failed. Only one session is active at a time; see
//! [`SessionManager`].

pub mod manager;
pub mod reading;
pub mod writing;

use thiserror::Error;

use crate::domain::ExerciseKind;

pub use manager::{GradingTicket, LoadTicket, SessionListener, SessionManager};
pub use reading::{reading_score, ReadingPhase, ReadingSession};
pub use writing::{WritingPhase, WritingSession};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No exercise in progress")]
    NoActiveSession,
    #[error("This action does not apply to a {0} exercise")]
    WrongKind(ExerciseKind),
    #[error("Cannot {action} at this point")]
    InvalidPhase { action: &'static str },
    #[error("Question {0} does not exist")]
    QuestionOutOfRange(usize),
    #[error("Option {option} does not exist for question {question}")]
    OptionOutOfRange { question: usize, option: usize },
    #[error("Answer every question before submitting ({0} left)")]
    Unanswered(usize),
    #[error("Write at least {min} characters before submitting")]
    DraftTooShort { min: usize },
}

/// Coarse lifecycle position, shared by both exercise kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Submitted,
    Graded,
    Finished,
    Failed,
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    Reading(ReadingSession),
    Writing(WritingSession),
    Failed { message: String },
}

/// The single active exercise attempt
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    /// Token identifying this attempt; async results carrying another
    /// generation are discarded
    pub generation: u64,
    pub kind: ExerciseKind,
    /// Learner level when the session started
    pub level: u8,
    pub state: SessionState,
}

impl ExerciseSession {
    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Failed { .. } => SessionPhase::Failed,
            SessionState::Reading(r) => match r.phase() {
                ReadingPhase::Answering => SessionPhase::Ready,
                ReadingPhase::Submitted { .. } => SessionPhase::Submitted,
                ReadingPhase::Finished { .. } => SessionPhase::Finished,
            },
            SessionState::Writing(w) => match w.phase() {
                WritingPhase::Drafting => SessionPhase::Ready,
                WritingPhase::Grading => SessionPhase::Submitted,
                WritingPhase::Graded(_) => SessionPhase::Graded,
                WritingPhase::Finished { .. } => SessionPhase::Finished,
            },
        }
    }
}
