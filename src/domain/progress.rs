use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::progression::experience_to_next_level;

/// Which screen an exercise was completed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
  Reading,
  Writing,
}

impl ExerciseKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Reading => "reading",
      Self::Writing => "writing",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Reading => "Reading",
      Self::Writing => "Writing",
    }
  }
}

impl std::fmt::Display for ExerciseKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One completed exercise. Never modified after it is appended to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
  pub id: String,
  pub kind: ExerciseKind,
  pub score: u8,
  pub completed_at: DateTime<Utc>,
  /// Level before this exercise's experience was applied
  pub level_at_completion: u8,
}

/// The learner's persisted progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
  pub level: u8,
  pub experience: u32,
  pub experience_to_next_level: u32,
  #[serde(default)]
  pub history: Vec<ExerciseRecord>,
}

impl Default for ProgressRecord {
  fn default() -> Self {
    Self {
      level: config::MIN_LEVEL,
      experience: 0,
      experience_to_next_level: experience_to_next_level(config::MIN_LEVEL),
      history: Vec::new(),
    }
  }
}

impl ProgressRecord {
  /// A decoded record is usable only if its level is in range and the
  /// threshold is positive.
  pub fn is_valid(&self) -> bool {
    (config::MIN_LEVEL..=config::MAX_LEVEL).contains(&self.level)
      && self.experience_to_next_level > 0
  }

  pub fn is_max_level(&self) -> bool {
    self.level >= config::MAX_LEVEL
  }

  /// Fill of the experience bar, capped at 100
  pub fn percentage(&self) -> u32 {
    if self.experience_to_next_level == 0 {
      return 0;
    }
    (self.experience.saturating_mul(100) / self.experience_to_next_level).min(100)
  }

  /// Most recent entries first
  pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &ExerciseRecord> {
    self.history.iter().rev().take(limit)
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }
}
