//! LLM backend trait and shared result types

use async_trait::async_trait;

use crate::prompt::Message;
use crate::LlmError;

/// Token usage reported by the service, consumed for external metering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A completed generation.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Raw text returned by the service
    pub text: String,
    pub usage: TokenUsage,
}

/// Backend trait for the text-understanding service.
///
/// Implementations are expected to retry transient transport failures
/// internally (see `AnthropicConfig::max_retries`) and to surface
/// `LlmError::InvalidResponse` without retrying: malformed output degrades
/// to "no change" at the extraction layer, not to another network call.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run one generation over the given messages.
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
