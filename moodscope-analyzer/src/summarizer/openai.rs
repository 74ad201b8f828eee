//! OpenAI chat-completions summarizer.

use super::{Summarizer, SummarizerError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI API summarizer.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    /// Create a new summarizer against the public OpenAI API.
    pub fn new(api_key: Option<&str>, model: impl Into<String>) -> Self {
        Self::with_base_url(
            api_key,
            "https://api.openai.com",
            model,
            Duration::from_secs(300),
        )
    }

    /// Create with custom base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(
        api_key: Option<&str>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn error(&self, message: String, status_code: Option<u16>) -> SummarizerError {
        SummarizerError {
            provider: "openai".into(),
            model: self.model.clone(),
            message,
            status_code,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn complete(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, SummarizerError> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request = OpenAiRequest {
            model: &self.model,
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: system_instruction,
                },
                OpenAiMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.error(format!("Request failed: {}", e), None))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.error(format!("API error: {}", body), Some(status.as_u16())));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| self.error(format!("Failed to parse response: {}", e), None))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| self.error("Response contained no content".into(), None))?;

        tracing::info!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            response_chars = content.chars().count(),
            "Summary generated"
        );

        Ok(content)
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_request_serialization() {
        let request = OpenAiRequest {
            model: "gpt-4",
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: "Be helpful",
                },
                OpenAiMessage {
                    role: "user",
                    content: "Hello",
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_error_display() {
        let summarizer = OpenAiSummarizer::new(Some("sk-test"), "gpt-4");
        let err = summarizer.error("API error: nope".into(), Some(500));
        assert_eq!(err.to_string(), "[openai:gpt-4] API error: nope");
        assert_eq!(err.status_code, Some(500));
    }
}
