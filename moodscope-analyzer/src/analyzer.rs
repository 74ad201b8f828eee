//! Per-post scoring: severity plus sentiment in one result record.

use std::sync::Arc;

use crate::classifier::{SentimentClassifier, SeverityClassifier};
use crate::error::AnalysisError;
use crate::models::{Post, PostAnalysis, SeverityLabel};

/// Combines the two classifiers. No retry, no caching.
#[derive(Clone)]
pub struct PostAnalyzer {
    severity: Arc<dyn SeverityClassifier>,
    sentiment: Arc<dyn SentimentClassifier>,
}

impl PostAnalyzer {
    pub fn new(
        severity: Arc<dyn SeverityClassifier>,
        sentiment: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            severity,
            sentiment,
        }
    }

    /// Score one post. Either classifier failing fails the post.
    pub async fn analyze(&self, post: &Post) -> Result<PostAnalysis, AnalysisError> {
        let severity = self.severity.classify_severity(&post.text).await?;

        if !(0.0..=1.0).contains(&severity.score) {
            return Err(AnalysisError::ClassificationFailure(format!(
                "severity score {} outside [0, 1]",
                severity.score
            )));
        }

        // Display form ("Severe", "Not depression") comes from the enum.
        let severity_label = severity
            .label
            .parse::<SeverityLabel>()
            .map_err(|e| AnalysisError::ClassificationFailure(e.to_string()))?;

        let sentiment = self.sentiment.classify_sentiment(&post.text).await?;
        let emotion_label = title_case(&sentiment.label);

        tracing::debug!(
            post_id = %post.id,
            repost = post.is_repost(),
            severity = %severity_label,
            emotion = %emotion_label,
            "Analyzed post"
        );

        Ok(PostAnalysis::new(
            post.text.clone(),
            emotion_label,
            severity_label,
            severity.score,
        ))
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
