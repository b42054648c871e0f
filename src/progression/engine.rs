//! Converts an exercise score into experience and levels.
//!
//! Leveling is single-step: one completion grants at most one level, and
//! whatever remains carries over as experience even if it is still above the
//! threshold. Once the maximum level is reached, experience is pinned to the
//! threshold, including on the completion that reaches it.

use chrono::{DateTime, Utc};

use crate::config;
use crate::domain::{ExerciseKind, ExerciseRecord, ProgressRecord};

/// Experience earned for a score: round(score * 1.5)
pub fn experience_for_score(score: u8) -> u32 {
  (f64::from(score.min(100)) * config::XP_MULTIPLIER).round() as u32
}

/// Apply one completed exercise and return the updated record.
///
/// The appended history entry records the level held before this update.
pub fn apply_result(
  progress: &ProgressRecord,
  score: u8,
  kind: ExerciseKind,
  completed_at: DateTime<Utc>,
) -> ProgressRecord {
  let score = score.min(100);
  let threshold = progress.experience_to_next_level;
  let level_before = progress.level;

  let mut level = progress.level;
  let mut experience = progress.experience.saturating_add(experience_for_score(score));

  if level < config::MAX_LEVEL && experience >= threshold {
    experience -= threshold;
    level += 1;
  }
  if level >= config::MAX_LEVEL {
    level = config::MAX_LEVEL;
    experience = threshold;
  }

  let mut history = progress.history.clone();
  history.push(ExerciseRecord {
    id: format!("{}-{}", completed_at.timestamp_millis(), history.len()),
    kind,
    score,
    completed_at,
    level_at_completion: level_before,
  });

  ProgressRecord {
    level,
    experience,
    experience_to_next_level: threshold,
    history,
  }
}
