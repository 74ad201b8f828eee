//! Narrative summarization backends.

mod openai;

pub use openai::OpenAiSummarizer;

use async_trait::async_trait;

/// Error from a summarization backend.
#[derive(Debug, Clone)]
pub struct SummarizerError {
    pub provider: String,
    pub model: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl std::fmt::Display for SummarizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.provider, self.model, self.message)
    }
}

impl std::error::Error for SummarizerError {}

/// Free-text completion given a system instruction and a user prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, SummarizerError>;
}
