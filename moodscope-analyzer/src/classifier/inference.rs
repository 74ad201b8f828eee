//! Hosted text-classification inference client.

use super::{ClassifierError, Prediction, SentimentClassifier, SeverityClassifier};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Calls `POST {base_url}/models/{model}` with `{"inputs": text}` and
/// returns the highest-scoring label. One instance per model.
pub struct InferenceClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl InferenceClassifier {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_token: Option<&str>,
        timeout: Duration,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = api_token.filter(|t| !t.is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
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

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify `text` and return the top-ranked prediction.
    pub async fn classify(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let start = Instant::now();
        let url = format!("{}/models/{}", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| ClassifierError::Request {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<InferenceErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClassifierError::Api {
                model: self.model.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: InferenceResponse =
            response.json().await.map_err(|e| ClassifierError::Malformed {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let top = parsed
            .into_scores()
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| ClassifierError::Malformed {
                model: self.model.clone(),
                message: "no labels returned".into(),
            })?;

        tracing::debug!(
            model = %self.model,
            label = %top.label,
            score = top.score,
            latency_ms = start.elapsed().as_millis() as u64,
            "Classified text"
        );

        Ok(Prediction::new(top.label, top.score))
    }
}

#[async_trait]
impl SeverityClassifier for InferenceClassifier {
    async fn classify_severity(&self, text: &str) -> Result<Prediction, ClassifierError> {
        self.classify(text).await
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClassifier {
    async fn classify_sentiment(&self, text: &str) -> Result<Prediction, ClassifierError> {
        self.classify(text).await
    }
}

// ============================================================================
// Inference API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Single inputs come back either nested per input or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InferenceErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_response_shape() {
        let parsed: InferenceResponse = serde_json::from_str(
            r#"[[{"label":"severe","score":0.7},{"label":"moderate","score":0.2}]]"#,
        )
        .unwrap();
        let scores = parsed.into_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "severe");
    }

    #[test]
    fn test_flat_response_shape() {
        let parsed: InferenceResponse =
            serde_json::from_str(r#"[{"label":"positive","score":0.9}]"#).unwrap();
        assert_eq!(parsed.into_scores()[0].label, "positive");
    }

    #[test]
    fn test_empty_nested_response() {
        let parsed: InferenceResponse = serde_json::from_str("[]").unwrap();
        assert!(parsed.into_scores().is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let classifier = InferenceClassifier::new(
            "http://localhost:8080/",
            "org/model",
            None,
            Duration::from_secs(5),
        );
        assert_eq!(classifier.base_url, "http://localhost:8080");
        assert_eq!(classifier.model(), "org/model");
    }
}
