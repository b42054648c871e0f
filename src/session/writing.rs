//! Writing flow: draft, submit for grading, review feedback, finalize.

use crate::config;
use crate::domain::{WritingFeedback, WritingScenario};
use crate::session::SessionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritingPhase {
    Drafting,
    /// Evaluation request in flight; draft locked
    Grading,
    Graded(WritingFeedback),
    Finished { score: u8 },
}

#[derive(Debug, Clone)]
pub struct WritingSession {
    scenario: WritingScenario,
    draft: String,
    phase: WritingPhase,
}

/// Draft length as counted for the submission minimum
pub fn draft_len(draft: &str) -> usize {
    draft.trim().chars().count()
}

impl WritingSession {
    pub fn new(scenario: WritingScenario) -> Self {
        Self {
            scenario,
            draft: String::new(),
            phase: WritingPhase::Drafting,
        }
    }

    pub fn scenario(&self) -> &WritingScenario {
        &self.scenario
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn phase(&self) -> &WritingPhase {
        &self.phase
    }

    pub fn feedback(&self) -> Option<&WritingFeedback> {
        match &self.phase {
            WritingPhase::Graded(feedback) => Some(feedback),
            _ => None,
        }
    }

    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != WritingPhase::Drafting {
            return Err(SessionError::InvalidPhase {
                action: "edit the draft",
            });
        }
        self.draft = text.into();
        Ok(())
    }

    /// Lock the draft while it is evaluated.
    pub fn begin_grading(&mut self) -> Result<(), SessionError> {
        if self.phase != WritingPhase::Drafting {
            return Err(SessionError::InvalidPhase { action: "submit" });
        }
        if draft_len(&self.draft) < config::MIN_DRAFT_CHARS {
            return Err(SessionError::DraftTooShort {
                min: config::MIN_DRAFT_CHARS,
            });
        }
        self.phase = WritingPhase::Grading;
        Ok(())
    }

    /// Evaluation failed: unlock the draft so it can be resubmitted.
    pub fn grading_failed(&mut self) {
        if self.phase == WritingPhase::Grading {
            self.phase = WritingPhase::Drafting;
        }
    }

    pub fn graded(&mut self, feedback: WritingFeedback) -> Result<(), SessionError> {
        if self.phase != WritingPhase::Grading {
            return Err(SessionError::InvalidPhase {
                action: "record feedback",
            });
        }
        self.phase = WritingPhase::Graded(feedback);
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<u8, SessionError> {
        match &self.phase {
            WritingPhase::Graded(feedback) => {
                let score = feedback.score;
                self.phase = WritingPhase::Finished { score };
                Ok(score)
            }
            _ => Err(SessionError::InvalidPhase { action: "finish" }),
        }
    }
}
