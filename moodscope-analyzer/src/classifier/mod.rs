//! Text classifier capabilities.
//!
//! The two pretrained models are opaque scoring functions behind these
//! traits. They are constructed once at startup and injected into the
//! pipeline, so tests can substitute fakes.

mod inference;

pub use inference::InferenceClassifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Top-ranked label and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Error from a classifier backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("[{model}] request failed: {message}")]
    Request { model: String, message: String },

    #[error("[{model}] API error ({status}): {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    #[error("[{model}] malformed response: {message}")]
    Malformed { model: String, message: String },
}

/// Scores depression severity: Not depression, Moderate, or Severe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeverityClassifier: Send + Sync {
    async fn classify_severity(&self, text: &str) -> Result<Prediction, ClassifierError>;
}

/// Scores emotional polarity, e.g. Positive, Neutral, Negative.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify_sentiment(&self, text: &str) -> Result<Prediction, ClassifierError>;
}
