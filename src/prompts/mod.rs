//! Builds the three LLM requests: reading exercise, writing scenario and
//! writing evaluation.
//!
//! Every request pairs prompt text with an output schema. Prompts embed the
//! level's context, randomly chosen variables for variety, and a worked
//! example of the expected output.

pub mod reading;
pub mod schema;
pub mod variables;
pub mod writing;

use rand::Rng;

use crate::domain::WritingScenario;
use crate::llm::GenerationRequest;

pub use variables::{ReadingVariables, WritingVariables};

/// Holds the language-dependent parts of every prompt.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    explanation_language: String,
}

impl PromptComposer {
    pub fn new(explanation_language: impl Into<String>) -> Self {
        Self {
            explanation_language: explanation_language.into(),
        }
    }

    pub fn explanation_language(&self) -> &str {
        &self.explanation_language
    }

    fn system_instruction(&self) -> String {
        format!(
            "You are an experienced English teacher who trains software engineers whose native \
             language is {}. You create realistic workplace material from the tech industry. \
             Always respond with a single JSON object that matches the provided schema, \
             without Markdown fences or commentary.",
            self.explanation_language
        )
    }

    /// Request for a reading exercise with a random topic and tone.
    pub fn reading_exercise<R: Rng>(&self, level: u8, rng: &mut R) -> GenerationRequest {
        let vars = ReadingVariables::choose(rng);
        tracing::debug!(topic = vars.topic, tone = vars.tone, "Composing reading exercise");
        self.reading_exercise_with(level, vars)
    }

    pub fn reading_exercise_with(&self, level: u8, vars: ReadingVariables) -> GenerationRequest {
        GenerationRequest {
            prompt: reading::exercise_prompt(level, vars, &self.explanation_language),
            system_instruction: Some(self.system_instruction()),
            schema: schema::reading_exercise_schema(),
        }
    }

    /// Request for a writing scenario with a random situation and tone.
    pub fn writing_scenario<R: Rng>(&self, level: u8, rng: &mut R) -> GenerationRequest {
        let vars = WritingVariables::choose(rng);
        tracing::debug!(
            situation = vars.situation,
            tone = vars.tone,
            "Composing writing scenario"
        );
        self.writing_scenario_with(level, vars)
    }

    pub fn writing_scenario_with(&self, level: u8, vars: WritingVariables) -> GenerationRequest {
        GenerationRequest {
            prompt: writing::scenario_prompt(level, vars, &self.explanation_language),
            system_instruction: Some(self.system_instruction()),
            schema: schema::writing_scenario_schema(),
        }
    }

    /// Request to grade the learner's draft for `scenario`.
    pub fn writing_evaluation(
        &self,
        scenario: &WritingScenario,
        level: u8,
        draft: &str,
    ) -> GenerationRequest {
        GenerationRequest {
            prompt: writing::evaluation_prompt(scenario, level, draft, &self.explanation_language),
            system_instruction: Some(self.system_instruction()),
            schema: schema::writing_feedback_schema(),
        }
    }
}
