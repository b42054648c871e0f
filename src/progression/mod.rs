//! Level policy and experience progression.

pub mod engine;
pub mod level_policy;

pub use engine::{apply_result, experience_for_score};
pub use level_policy::{experience_to_next_level, prompt_context_of, tier_of, Tier};
