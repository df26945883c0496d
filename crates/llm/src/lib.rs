//! Text-understanding service integration
//!
//! The qualification engine treats fact extraction as an external
//! text-understanding call: a bounded conversation window and an optional
//! rubric description go in, a structured fact object and a token usage
//! metric come out. This crate provides the backend trait, the Anthropic
//! Messages API implementation, prompt construction, and response parsing.

pub mod anthropic;
pub mod backend;
pub mod mock;
pub mod prompt;

pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use backend::{GenerationResult, LlmBackend, TokenUsage};
pub use mock::MockBackend;
pub use prompt::{extraction_messages, parse_extracted, Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The service answered, but not with parseable structured output.
    /// Never retried; the caller degrades to "no change".
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Transient failures worth retrying; malformed output is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Network(_) | LlmError::Timeout)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for leadqual_core::Error {
    fn from(err: LlmError) -> Self {
        leadqual_core::Error::Extraction(err.to_string())
    }
}
