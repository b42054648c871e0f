//! Output schemas sent to the model with each request.
//!
//! These describe the JSON shape to the provider; the crate does not trust
//! them and re-checks the decoded values (see `domain::Validate`).

use serde_json::{json, Value};

pub fn reading_exercise_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": { "type": "STRING" },
            "sender": { "type": "STRING", "description": "Name and role of the sender" },
            "body": { "type": "STRING" },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "correctIndex": { "type": "INTEGER" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["question", "options", "correctIndex", "explanation"]
                }
            }
        },
        "required": ["subject", "sender", "body", "questions"]
    })
}

pub fn writing_scenario_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "context": { "type": "STRING" },
            "recipientRole": { "type": "STRING" },
            "goal": { "type": "STRING" },
            "keyPoints": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["context", "recipientRole", "goal", "keyPoints"]
    })
}

pub fn writing_feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": "0 to 100" },
            "critique": { "type": "STRING" },
            "improvedVersion": { "type": "STRING" },
            "grammarMistakes": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["score", "critique", "improvedVersion", "grammarMistakes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            required(&reading_exercise_schema()),
            vec!["subject", "sender", "body", "questions"]
        );
        assert_eq!(
            required(&reading_exercise_schema()["properties"]["questions"]["items"]),
            vec!["question", "options", "correctIndex", "explanation"]
        );
        assert_eq!(
            required(&writing_scenario_schema()),
            vec!["context", "recipientRole", "goal", "keyPoints"]
        );
        assert_eq!(
            required(&writing_feedback_schema()),
            vec!["score", "critique", "improvedVersion", "grammarMistakes"]
        );
    }

    #[test]
    fn test_every_required_field_is_described() {
        for schema in [
            reading_exercise_schema(),
            writing_scenario_schema(),
            writing_feedback_schema(),
        ] {
            for field in required(&schema) {
                assert!(schema["properties"].get(field).is_some(), "{}", field);
            }
        }
    }
}
