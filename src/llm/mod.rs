//! LLM layer: client abstraction, the Gemini backend, and decoding of
//! structured responses into domain types.

pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod traits;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::Validate;

pub use gemini::GeminiClient;
pub use traits::LlmClient;

/// One structured-output call: prompt, optional system instruction and the
/// JSON schema the response must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub schema: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Generate and decode a structured value.
///
/// Fails on empty text, invalid JSON, missing required fields, or a value
/// that does not pass [`Validate`]. Never returns a partial value.
pub async fn generate_structured<T>(
    client: &dyn LlmClient,
    request: &GenerationRequest,
) -> Result<T, LlmError>
where
    T: DeserializeOwned + Validate,
{
    let text = client.generate(request).await?;
    decode_structured(&text)
}

/// Decode response text into `T`, applying the same checks as
/// [`generate_structured`].
pub fn decode_structured<T>(text: &str) -> Result<T, LlmError>
where
    T: DeserializeOwned + Validate,
{
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let value: T = serde_json::from_str(body).map_err(|e| LlmError::Malformed(e.to_string()))?;
    value.validate().map_err(LlmError::Malformed)?;
    Ok(value)
}

/// Remove a surrounding Markdown code fence (```json ... ```) if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string ("json") on the opening line
    match rest.find('\n') {
        Some(idx) => rest[idx + 1..].trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedLlmClient;
    use super::*;
    use crate::domain::{ReadingExercise, WritingScenario};

    const SCENARIO: &str = r#"{"context":"c","recipientRole":"r","goal":"g","keyPoints":["a"]}"#;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "p".to_string(),
            system_instruction: None,
            schema: serde_json::json!({}),
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_decode_empty_is_error() {
        let result = decode_structured::<WritingScenario>("   ");
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_decode_invalid_json_is_malformed() {
        let result = decode_structured::<WritingScenario>("{\"context\": ");
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }

    #[test]
    fn test_decode_missing_field_is_malformed() {
        let result = decode_structured::<WritingScenario>(r#"{"context":"c","goal":"g"}"#);
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }

    #[test]
    fn test_decode_failing_validation_is_malformed() {
        let json = r#"{"subject":"s","sender":"x","body":"b","questions":[]}"#;
        let result = decode_structured::<ReadingExercise>(json);
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }

    #[test]
    fn test_decode_fenced_value() {
        let fenced = format!("```json\n{}\n```", SCENARIO);
        let scenario: WritingScenario = decode_structured(&fenced).unwrap();
        assert_eq!(scenario.key_points, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_structured_passes_through_client_error() {
        let client = ScriptedLlmClient::new();
        client.push_err(LlmError::Transport("connection reset".to_string()));
        let result = generate_structured::<WritingScenario>(&client, &request()).await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }

    #[tokio::test]
    async fn test_generate_structured_records_request() {
        let client = ScriptedLlmClient::new();
        client.push_ok(SCENARIO);
        let scenario: WritingScenario = generate_structured(&client, &request()).await.unwrap();
        assert_eq!(scenario.context, "c");
        assert_eq!(client.requests().len(), 1);
        assert_eq!(client.requests()[0].prompt, "p");
    }
}
