//! Scripted LLM client for tests: replays queued responses in order and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{GenerationRequest, LlmClient, LlmError};

#[derive(Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Transport("no scripted response left".to_string())))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Canned provider output used across session and handler tests.
pub mod fixtures {
    pub const READING_EXERCISE: &str = r#"{
      "subject": "Rollback of release 4.2",
      "sender": "Morgan Lee, Engineering Manager",
      "body": "Team, we rolled back 4.2 after error rates tripled. Please hold merges until the postmortem on Thursday.",
      "questions": [
        {"question": "Why was 4.2 rolled back?", "options": ["Error rates rose", "A holiday", "A new hire", "Budget"], "correctIndex": 0, "explanation": "A taxa de erros triplicou."},
        {"question": "What should the team do?", "options": ["Merge faster", "Hold merges", "Skip tests", "Deploy 4.3"], "correctIndex": 1, "explanation": "Pede para segurar os merges."},
        {"question": "When is the postmortem?", "options": ["Monday", "Tuesday", "Thursday", "Friday"], "correctIndex": 2, "explanation": "O postmortem é na quinta."}
      ]
    }"#;

    pub const WRITING_SCENARIO: &str = r#"{
      "context": "The on-call engineer paged you at 3am about a disk alert you configured wrongly.",
      "recipientRole": "On-call Engineer",
      "goal": "Pedir desculpas e explicar a correção",
      "keyPoints": ["Assumir a responsabilidade", "Explicar a correção", "Agradecer"]
    }"#;

    pub const WRITING_FEEDBACK: &str = r#"{
      "score": 78,
      "critique": "Boa estrutura. Tente: \"Sorry for the late-night page.\"",
      "improvedVersion": "Hi Sam, sorry for the late-night page. I've fixed the alert threshold.",
      "grammarMistakes": ["\"I have fix\" -> \"I have fixed\""]
    }"#;
}
