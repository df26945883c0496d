//! Scripted backend for tests and local development
//!
//! Responses are queued ahead of time and popped per call, so tests can
//! script multi-turn conversations, transient failures, and malformed
//! replies without a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use leadqual_core::ExtractedFacts;

use crate::backend::{GenerationResult, LlmBackend, TokenUsage};
use crate::prompt::Message;
use crate::LlmError;

/// Scripted LLM backend.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text reply.
    pub fn push_text(&self, text: impl Into<String>) {
        self.responses.lock().push_back(Ok(text.into()));
    }

    /// Queue a structured fact reply, serialized the way the real service
    /// answers.
    pub fn push_facts(&self, facts: &ExtractedFacts) {
        let json = serde_json::to_string(facts).expect("facts serialize");
        self.responses.lock().push_back(Ok(json));
    }

    /// Queue an error.
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn generate(&self, _messages: &[Message]) -> Result<GenerationResult, LlmError> {
        *self.calls.lock() += 1;

        let scripted = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_string()));

        scripted.map(|text| GenerationResult {
            text,
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 20,
            },
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
