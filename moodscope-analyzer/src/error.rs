//! Error types for moodscope-analyzer.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::classifier::ClassifierError;
use crate::source::SourceError;
use crate::summarizer::SummarizerError;

/// Failures surfaced by the analysis pipeline.
///
/// Every kind is request-local and never retried. A batch either succeeds
/// completely or fails with one of these.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid username. It must be 1-15 characters long and contain only letters, numbers, or underscores.")]
    InvalidUsername,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No more tweets found.")]
    NoMorePosts,

    #[error("Rate limit exceeded. Try again later.")]
    UpstreamRateLimited,

    #[error("Invalid or expired bearer token.")]
    UpstreamUnauthorized,

    #[error("Classification failed: {0}")]
    ClassificationFailure(String),

    #[error("No tweet data provided")]
    EmptyInput,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl AnalysisError {
    /// Stable machine-readable code for API responses.
    pub const fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUsername => "INVALID_USERNAME",
            AnalysisError::UserNotFound(_) => "USER_NOT_FOUND",
            AnalysisError::NoMorePosts => "NO_MORE_POSTS",
            AnalysisError::UpstreamRateLimited => "RATE_LIMITED",
            AnalysisError::UpstreamUnauthorized => "UNAUTHORIZED",
            AnalysisError::ClassificationFailure(_) => "CLASSIFICATION_FAILED",
            AnalysisError::EmptyInput => "EMPTY_INPUT",
            AnalysisError::InvalidRequest(_) => "INVALID_REQUEST",
            AnalysisError::SummarizationFailed(_) => "SUMMARIZATION_FAILED",
            AnalysisError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidUsername
            | AnalysisError::EmptyInput
            | AnalysisError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AnalysisError::UserNotFound(_) | AnalysisError::NoMorePosts => StatusCode::NOT_FOUND,
            AnalysisError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::UpstreamUnauthorized => StatusCode::UNAUTHORIZED,
            AnalysisError::ClassificationFailure(_) | AnalysisError::SummarizationFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AnalysisError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SourceError> for AnalysisError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::RateLimited => AnalysisError::UpstreamRateLimited,
            SourceError::Unauthorized => AnalysisError::UpstreamUnauthorized,
            SourceError::Upstream(message) => AnalysisError::Upstream(message),
        }
    }
}

impl From<JsonRejection> for AnalysisError {
    fn from(rejection: JsonRejection) -> Self {
        AnalysisError::InvalidRequest(rejection.body_text())
    }
}

impl From<ClassifierError> for AnalysisError {
    fn from(err: ClassifierError) -> Self {
        AnalysisError::ClassificationFailure(err.to_string())
    }
}

impl From<SummarizerError> for AnalysisError {
    fn from(err: SummarizerError) -> Self {
        AnalysisError::SummarizationFailed(err.to_string())
    }
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "error": ApiError {
                code: self.code().to_string(),
                message: self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
