use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling an LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("LLM response is empty or undefined")]
    EmptyContent,
}

/// Single-prompt text completion
///
/// Handlers and evaluators receive an implementation of this trait instead of
/// reaching for a process-wide client, so tests can substitute canned output.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the text of the first candidate
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
