//! moodscope-analyzer - Depression-severity and sentiment analysis of a user's recent posts.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod classifier;
pub mod cursor;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod routes;
pub mod source;
pub mod summarizer;
pub mod username;

pub use analyzer::PostAnalyzer;
pub use classifier::{
    ClassifierError, InferenceClassifier, Prediction, SentimentClassifier, SeverityClassifier,
};
pub use cursor::{PostCursor, BATCH_SIZE};
pub use error::AnalysisError;
pub use models::{
    ContinuationReport, PaginationCursor, Post, PostAnalysis, PostBatch, SeverityLabel,
    SummaryReport, UserAnalysisReport, UserProfile, UserRef,
};
pub use pipeline::BatchAnalyzer;
pub use prompt::build_prompt;
pub use routes::{build_router, serve, AppState};
pub use source::{PostSource, SourceError, TwitterClient};
pub use summarizer::{OpenAiSummarizer, Summarizer, SummarizerError};
