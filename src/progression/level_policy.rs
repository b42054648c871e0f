//! Maps a level to its difficulty tier and to the prompt context that steers
//! the LLM's vocabulary and tone.

use serde::Serialize;

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
  Beginner,
  Intermediate,
  Advanced,
}

impl Tier {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
    }
  }

  /// Style guidance handed to the model for this tier
  pub fn guidance(&self) -> &'static str {
    match self {
      Self::Beginner => {
        "Use simple, high-frequency vocabulary and short, direct sentences. \
         Avoid idioms, slang and phrasal verbs. Only use common technical terms \
         (bug, deploy, test, server) and make their meaning clear from context."
      }
      Self::Intermediate => {
        "Use technical jargon freely (rollback, flaky test, tech debt, on-call, \
         root cause, code freeze) with natural professional phrasing and \
         moderately complex sentences, as a colleague on an international team would."
      }
      Self::Advanced => {
        "Write like a native-speaking senior engineer: use idioms, phrasal verbs, \
         hedging, diplomatic understatement and implied meaning. Nuance and tone \
         matter as much as the literal content."
      }
    }
  }
}

impl std::fmt::Display for Tier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

pub fn tier_of(level: u8) -> Tier {
  if level <= config::BEGINNER_MAX_LEVEL {
    Tier::Beginner
  } else if level <= config::INTERMEDIATE_MAX_LEVEL {
    Tier::Intermediate
  } else {
    Tier::Advanced
  }
}

/// Natural-language description of the learner's level, embedded in every
/// prompt.
pub fn prompt_context_of(level: u8) -> String {
  let tier = tier_of(level);
  format!(
    "The learner is a software engineer at level {} of {} ({} English). {}",
    level,
    config::MAX_LEVEL,
    tier,
    tier.guidance()
  )
}

/// Experience required to leave `level`. Constant across levels.
pub fn experience_to_next_level(_level: u8) -> u32 {
  config::EXPERIENCE_PER_LEVEL
}
