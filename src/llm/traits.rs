//! LLM client abstraction.
//!
//! Backends implement [`LlmClient`]: one prompt plus an output schema in, the
//! raw response text out.

use async_trait::async_trait;

use crate::llm::{GenerationRequest, LlmError};

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one structured-output generation and return the response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
