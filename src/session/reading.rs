//! Reading flow: answer every question, submit, review, finish.

use crate::domain::ReadingExercise;
use crate::session::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingPhase {
    /// Selections may still change
    Answering,
    /// Answers locked, correctness revealed
    Submitted { score: u8 },
    Finished { score: u8 },
}

#[derive(Debug, Clone)]
pub struct ReadingSession {
    exercise: ReadingExercise,
    selections: Vec<Option<usize>>,
    phase: ReadingPhase,
}

/// round(100 * correct / total); an empty exercise scores 0.
pub fn reading_score(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u8
}

impl ReadingSession {
    pub fn new(exercise: ReadingExercise) -> Self {
        let selections = vec![None; exercise.questions.len()];
        Self {
            exercise,
            selections,
            phase: ReadingPhase::Answering,
        }
    }

    pub fn exercise(&self) -> &ReadingExercise {
        &self.exercise
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn phase(&self) -> ReadingPhase {
        self.phase
    }

    pub fn select(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        if self.phase != ReadingPhase::Answering {
            return Err(SessionError::InvalidPhase {
                action: "change an answer",
            });
        }
        let q = self
            .exercise
            .questions
            .get(question)
            .ok_or(SessionError::QuestionOutOfRange(question))?;
        if option >= q.options.len() {
            return Err(SessionError::OptionOutOfRange { question, option });
        }
        self.selections[question] = Some(option);
        Ok(())
    }

    pub fn unanswered(&self) -> usize {
        self.selections.iter().filter(|s| s.is_none()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.exercise
            .questions
            .iter()
            .zip(&self.selections)
            .filter(|(q, s)| **s == Some(q.correct_option_index))
            .count()
    }

    /// Lock the answers and compute the score.
    pub fn submit(&mut self) -> Result<u8, SessionError> {
        if self.phase != ReadingPhase::Answering {
            return Err(SessionError::InvalidPhase { action: "submit" });
        }
        let unanswered = self.unanswered();
        if unanswered > 0 {
            return Err(SessionError::Unanswered(unanswered));
        }
        let score = reading_score(self.correct_count(), self.exercise.questions.len());
        self.phase = ReadingPhase::Submitted { score };
        Ok(score)
    }

    /// Whether the answer to `question` was right. `None` until submitted.
    pub fn is_correct(&self, question: usize) -> Option<bool> {
        if self.phase == ReadingPhase::Answering {
            return None;
        }
        let q = self.exercise.questions.get(question)?;
        Some(self.selections.get(question).copied().flatten() == Some(q.correct_option_index))
    }

    pub fn finish(&mut self) -> Result<u8, SessionError> {
        match self.phase {
            ReadingPhase::Submitted { score } => {
                self.phase = ReadingPhase::Finished { score };
                Ok(score)
            }
            _ => Err(SessionError::InvalidPhase { action: "finish" }),
        }
    }
}
