//! Fixed pools of topics, tones and situations injected into prompts so that
//! consecutive exercises do not repeat themselves.
//!
//! Selection takes the random source as a parameter; callers decide whether it
//! is the thread RNG or a seeded one.

use rand::Rng;

/// Subjects for reading-exercise messages
pub const TOPICS: [&str; 20] = [
    "a production incident caused by a bad database migration",
    "a postmortem for a payment service outage",
    "a request for code review on a large refactoring pull request",
    "a flaky end-to-end test blocking the release pipeline",
    "planning the next sprint and negotiating scope",
    "deprecating a legacy REST API in favour of gRPC",
    "a security vulnerability found in a third-party dependency",
    "on-call rotation changes and handover notes",
    "a proposal to migrate CI from Jenkins to GitHub Actions",
    "a performance regression after a framework upgrade",
    "onboarding a new engineer to the team's codebase",
    "a disagreement about microservices versus a modular monolith",
    "a cloud cost spike traced to misconfigured autoscaling",
    "a customer-reported bug that cannot be reproduced locally",
    "a feature flag rollout that went wrong",
    "an architecture decision record for adopting event sourcing",
    "technical debt cleanup competing with feature work",
    "a data privacy request requiring changes to logging",
    "an outage of an external identity provider",
    "a code freeze before a major product launch",
];

/// Register and emotional tone of the generated text
pub const TONES: [&str; 10] = [
    "formal and corporate",
    "casual and friendly, like a Slack message between teammates",
    "urgent and stressed",
    "passive-aggressive",
    "apologetic",
    "enthusiastic and celebratory",
    "diplomatic, delivering bad news gently",
    "terse and direct, like a busy senior engineer",
    "frustrated but professional",
    "humorous and self-deprecating",
];

/// Workplace writing tasks for writing scenarios
pub const SITUATIONS: [&str; 14] = [
    "asking a senior colleague for help with a blocking bug",
    "reporting a production incident to stakeholders",
    "pushing back on an unrealistic deadline",
    "giving constructive feedback on a pull request",
    "requesting time off during a busy release period",
    "explaining a technical decision to a non-technical manager",
    "apologizing for breaking the build",
    "proposing a new tool or library to the team",
    "following up on an unanswered question from a teammate",
    "declining a meeting invitation politely",
    "writing a status update for a delayed project",
    "asking a product manager to clarify ambiguous requirements",
    "welcoming a new team member and offering help",
    "escalating a recurring issue with another team",
];

/// Uniformly pick one entry from a pool.
pub fn pick<R: Rng>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

/// Variables injected into a reading-exercise prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingVariables {
    pub topic: &'static str,
    pub tone: &'static str,
}

impl ReadingVariables {
    pub fn choose<R: Rng>(rng: &mut R) -> Self {
        Self {
            topic: pick(&TOPICS, rng),
            tone: pick(&TONES, rng),
        }
    }
}

/// Variables injected into a writing-scenario prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritingVariables {
    pub situation: &'static str,
    pub tone: &'static str,
}

impl WritingVariables {
    pub fn choose<R: Rng>(rng: &mut R) -> Self {
        Self {
            situation: pick(&SITUATIONS, rng),
            tone: pick(&TONES, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pools_have_no_duplicates() {
        for pool in [&TOPICS[..], &TONES[..], &SITUATIONS[..]] {
            let unique: HashSet<_> = pool.iter().collect();
            assert_eq!(unique.len(), pool.len());
        }
    }

    #[test]
    fn test_pick_stays_in_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(TOPICS.contains(&pick(&TOPICS, &mut rng)));
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let a = ReadingVariables::choose(&mut StdRng::seed_from_u64(42));
        let b = ReadingVariables::choose(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let c = WritingVariables::choose(&mut StdRng::seed_from_u64(42));
        let d = WritingVariables::choose(&mut StdRng::seed_from_u64(42));
        assert_eq!(c, d);
    }

    #[test]
    fn test_selection_covers_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<&str> = (0..2000).map(|_| pick(&TONES, &mut rng)).collect();
        assert_eq!(seen.len(), TONES.len());
    }
}
