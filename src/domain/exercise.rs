//! Exercise content as returned by the LLM.
//!
//! Field names on the wire follow the output schemas sent with each request
//! (`question`, `correctIndex`, `recipientRole`, ...). Deserialization alone
//! guarantees every required field is present and arrays are non-null;
//! [`Validate`] checks the rest of the minimum shape.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Shape checks that serde cannot express.
pub trait Validate {
  fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingQuestion {
  #[serde(rename = "question")]
  pub prompt: String,
  pub options: Vec<String>,
  #[serde(rename = "correctIndex")]
  pub correct_option_index: usize,
  pub explanation: String,
}

/// A workplace message followed by multiple-choice questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingExercise {
  pub subject: String,
  pub sender: String,
  pub body: String,
  pub questions: Vec<ReadingQuestion>,
}

impl Validate for ReadingExercise {
  fn validate(&self) -> Result<(), String> {
    if self.body.trim().is_empty() {
      return Err("message body is empty".to_string());
    }
    if self.questions.is_empty() {
      return Err("exercise has no questions".to_string());
    }
    for (i, q) in self.questions.iter().enumerate() {
      if q.prompt.trim().is_empty() {
        return Err(format!("question {} has no text", i + 1));
      }
      if q.options.len() < 2 {
        return Err(format!(
          "question {} has {} option(s), need at least 2",
          i + 1,
          q.options.len()
        ));
      }
      if q.correct_option_index >= q.options.len() {
        return Err(format!(
          "question {} has correctIndex {} but only {} options",
          i + 1,
          q.correct_option_index,
          q.options.len()
        ));
      }
    }
    Ok(())
  }
}

/// Situation the learner must write a message for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingScenario {
  pub context: String,
  pub recipient_role: String,
  pub goal: String,
  pub key_points: Vec<String>,
}

impl Validate for WritingScenario {
  fn validate(&self) -> Result<(), String> {
    if self.context.trim().is_empty() {
      return Err("scenario context is empty".to_string());
    }
    Ok(())
  }
}

/// Grade and critique of one submitted draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingFeedback {
  #[serde(deserialize_with = "deserialize_score")]
  pub score: u8,
  pub critique: String,
  pub improved_version: String,
  pub grammar_mistakes: Vec<String>,
}

impl Validate for WritingFeedback {
  fn validate(&self) -> Result<(), String> {
    if self.score > 100 {
      return Err(format!("score {} outside 0..=100", self.score));
    }
    Ok(())
  }
}

/// Accepts integer or fractional scores; fractional ones are rounded.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = f64::deserialize(deserializer)?;
  let rounded = raw.round();
  if !rounded.is_finite() || !(0.0..=100.0).contains(&rounded) {
    return Err(D::Error::custom(format!("score {} outside 0..=100", raw)));
  }
  Ok(rounded as u8)
}

#[cfg(test)]
mod tests {
  use super::*;

  const READING_JSON: &str = r#"{
    "subject": "Postmortem: checkout latency",
    "sender": "Dana, SRE Lead",
    "body": "Hi team, yesterday's deploy doubled p99 latency.",
    "questions": [
      {
        "question": "What happened?",
        "options": ["Latency rose", "Nothing", "An outage", "A refactor"],
        "correctIndex": 0,
        "explanation": "A mensagem diz que a latência dobrou."
      }
    ]
  }"#;

  #[test]
  fn test_reading_exercise_decodes_wire_names() {
    let exercise: ReadingExercise = serde_json::from_str(READING_JSON).unwrap();
    assert_eq!(exercise.questions.len(), 1);
    assert_eq!(exercise.questions[0].prompt, "What happened?");
    assert_eq!(exercise.questions[0].correct_option_index, 0);
    assert!(exercise.validate().is_ok());
  }

  #[test]
  fn test_reading_exercise_missing_field_fails() {
    let json = r#"{"subject": "s", "body": "b", "questions": []}"#;
    assert!(serde_json::from_str::<ReadingExercise>(json).is_err());
  }

  #[test]
  fn test_reading_exercise_null_questions_fails() {
    let json = r#"{"subject": "s", "sender": "x", "body": "b", "questions": null}"#;
    assert!(serde_json::from_str::<ReadingExercise>(json).is_err());
  }

  #[test]
  fn test_reading_exercise_rejects_empty_questions() {
    let json = r#"{"subject": "s", "sender": "x", "body": "b", "questions": []}"#;
    let exercise: ReadingExercise = serde_json::from_str(json).unwrap();
    assert!(exercise.validate().is_err());
  }

  #[test]
  fn test_reading_exercise_rejects_bad_correct_index() {
    let mut exercise: ReadingExercise = serde_json::from_str(READING_JSON).unwrap();
    exercise.questions[0].correct_option_index = 4;
    assert!(exercise.validate().unwrap_err().contains("correctIndex 4"));
  }

  #[test]
  fn test_reading_exercise_rejects_single_option() {
    let mut exercise: ReadingExercise = serde_json::from_str(READING_JSON).unwrap();
    exercise.questions[0].options.truncate(1);
    exercise.questions[0].correct_option_index = 0;
    assert!(exercise.validate().is_err());
  }

  #[test]
  fn test_writing_scenario_decodes() {
    let json = r#"{
      "context": "Your PR broke the nightly build.",
      "recipientRole": "Tech Lead",
      "goal": "Explicar o problema e propor uma correção",
      "keyPoints": ["Assumir o erro", "Propor rollback"]
    }"#;
    let scenario: WritingScenario = serde_json::from_str(json).unwrap();
    assert_eq!(scenario.recipient_role, "Tech Lead");
    assert_eq!(scenario.key_points.len(), 2);
    assert!(scenario.validate().is_ok());
  }

  #[test]
  fn test_writing_feedback_rounds_fractional_score() {
    let json = r#"{
      "score": 84.6,
      "critique": "Bom trabalho.",
      "improvedVersion": "Hi Sam, ...",
      "grammarMistakes": []
    }"#;
    let feedback: WritingFeedback = serde_json::from_str(json).unwrap();
    assert_eq!(feedback.score, 85);
    assert!(feedback.grammar_mistakes.is_empty());
  }

  #[test]
  fn test_writing_feedback_rejects_out_of_range_score() {
    let json = r#"{
      "score": 140,
      "critique": "c",
      "improvedVersion": "i",
      "grammarMistakes": []
    }"#;
    assert!(serde_json::from_str::<WritingFeedback>(json).is_err());

    let negative = json.replace("140", "-3");
    assert!(serde_json::from_str::<WritingFeedback>(&negative).is_err());
  }

  #[test]
  fn test_writing_feedback_requires_grammar_mistakes() {
    let json = r#"{"score": 70, "critique": "c", "improvedVersion": "i"}"#;
    assert!(serde_json::from_str::<WritingFeedback>(json).is_err());
  }
}
