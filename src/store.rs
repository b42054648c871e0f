//! Progress Store: owns the learner's progress record.
//!
//! The record is read once at startup and written back after every mutation.
//! Mutation goes through [`ProgressStore::apply_result`] only. Observers call
//! [`ProgressStore::subscribe`] to follow changes.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config;
use crate::db::{KeyValueStore, LogOnError};
use crate::domain::{ExerciseKind, ProgressRecord};
use crate::progression;

pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    state: watch::Sender<ProgressRecord>,
}

impl ProgressStore {
    /// Read the stored record, falling back to a fresh one when it is absent
    /// or unreadable.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let initial = read_progress(kv.as_ref());
        let (state, _) = watch::channel(initial);
        Self { kv, state }
    }

    /// Snapshot of the current record
    pub fn get(&self) -> ProgressRecord {
        self.state.borrow().clone()
    }

    pub fn level(&self) -> u8 {
        self.state.borrow().level
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressRecord> {
        self.state.subscribe()
    }

    /// Apply a finished exercise's score, persist, and return the new record.
    pub fn apply_result(&self, score: u8, kind: ExerciseKind) -> ProgressRecord {
        self.apply_result_at(score, kind, Utc::now())
    }

    pub fn apply_result_at(
        &self,
        score: u8,
        kind: ExerciseKind,
        completed_at: DateTime<Utc>,
    ) -> ProgressRecord {
        let mut updated = None;
        self.state.send_modify(|progress| {
            *progress = progression::apply_result(progress, score, kind, completed_at);
            updated = Some(progress.clone());
        });
        let updated = updated.unwrap_or_else(|| self.get());

        tracing::info!(
            "Recorded {} exercise: score {}, level {}, experience {}/{}",
            kind,
            score,
            updated.level,
            updated.experience,
            updated.experience_to_next_level
        );
        self.persist(&updated);
        updated
    }

    /// Write the record; failures are logged and otherwise ignored.
    fn persist(&self, progress: &ProgressRecord) {
        let Some(json) = progress.to_json().log_warn("Failed to serialize progress") else {
            return;
        };
        self.kv
            .set(config::PROGRESS_KEY, &json)
            .log_warn("Failed to persist progress");
    }
}

fn read_progress(kv: &dyn KeyValueStore) -> ProgressRecord {
    let stored = match kv.get(config::PROGRESS_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => {
            tracing::info!("No stored progress, starting at level {}", config::MIN_LEVEL);
            return ProgressRecord::default();
        }
        Err(e) => {
            tracing::warn!("Failed to read stored progress, using defaults: {}", e);
            return ProgressRecord::default();
        }
    };

    match ProgressRecord::from_json(&stored) {
        Ok(progress) if progress.is_valid() => progress,
        Ok(progress) => {
            tracing::warn!(
                "Stored progress out of range (level {}, threshold {}), using defaults",
                progress.level,
                progress.experience_to_next_level
            );
            ProgressRecord::default()
        }
        Err(e) => {
            tracing::warn!("Stored progress is malformed, using defaults: {}", e);
            ProgressRecord::default()
        }
    }
}
