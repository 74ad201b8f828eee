//! Batch analysis orchestration.
//!
//! Each call is one complete fetch → classify → aggregate transaction.
//! Nothing is kept between calls except the cursor the caller holds.

use std::sync::Arc;

use crate::analyzer::PostAnalyzer;
use crate::cursor::PostCursor;
use crate::error::AnalysisError;
use crate::models::{
    ContinuationReport, PaginationCursor, PostAnalysis, PostBatch, SummaryReport, UserAnalysisReport,
    UserAssessment, UserProfile,
};
use crate::prompt::{build_prompt, SUMMARY_SYSTEM_INSTRUCTION};
use crate::source::PostSource;
use crate::summarizer::Summarizer;
use crate::username::validate_username;

/// Drives fetch, per-post analysis, aggregation, and summarization.
#[derive(Clone)]
pub struct BatchAnalyzer {
    source: Arc<dyn PostSource>,
    cursor: PostCursor,
    analyzer: PostAnalyzer,
    summarizer: Arc<dyn Summarizer>,
}

impl BatchAnalyzer {
    pub fn new(
        source: Arc<dyn PostSource>,
        analyzer: PostAnalyzer,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            cursor: PostCursor::new(source.clone()),
            source,
            analyzer,
            summarizer,
        }
    }

    /// Analyze the next batch and attach the user-level verdict.
    pub async fn analyze_user_batch(
        &self,
        username: &str,
        cursor: PaginationCursor,
    ) -> Result<UserAnalysisReport, AnalysisError> {
        let (results, next_cursor) = self.fetch_and_analyze(username, cursor).await?;

        let assessment = UserAssessment::from_results(&results);
        tracing::info!(
            username = %username,
            analyzed = results.len(),
            verdict = assessment.message(),
            "Batch analyzed"
        );

        Ok(UserAnalysisReport {
            username: username.to_string(),
            message: assessment.message().to_string(),
            results,
            next_cursor,
        })
    }

    /// "Load more" continuation: same transaction, no aggregate message.
    pub async fn analyze_next_batch(
        &self,
        username: &str,
        cursor: PaginationCursor,
    ) -> Result<ContinuationReport, AnalysisError> {
        let (results, next_cursor) = self.fetch_and_analyze(username, cursor).await?;

        tracing::info!(
            username = %username,
            analyzed = results.len(),
            "Continuation batch analyzed"
        );

        Ok(ContinuationReport {
            results,
            next_cursor,
        })
    }

    /// Narrative summary over previously returned results. No re-fetching.
    pub async fn summarize(
        &self,
        results: &[PostAnalysis],
    ) -> Result<SummaryReport, AnalysisError> {
        let prompt = build_prompt(results)?;

        tracing::info!(
            posts = results.len(),
            prompt_chars = prompt.chars().count(),
            "Requesting summary"
        );

        let response = self
            .summarizer
            .complete(SUMMARY_SYSTEM_INSTRUCTION, &prompt)
            .await?;

        Ok(SummaryReport { response })
    }

    /// Public profile lookup.
    pub async fn fetch_profile(&self, username: &str) -> Result<UserProfile, AnalysisError> {
        validate_username(username)?;

        self.source
            .fetch_profile(username)
            .await?
            .ok_or_else(|| AnalysisError::UserNotFound(username.to_string()))
    }

    async fn fetch_and_analyze(
        &self,
        username: &str,
        cursor: PaginationCursor,
    ) -> Result<(Vec<PostAnalysis>, PaginationCursor), AnalysisError> {
        validate_username(username)?;

        let PostBatch { posts, next_cursor } =
            self.cursor.fetch_next_batch(username, cursor).await?;

        // Sequential, fetch order; the first failure aborts the whole batch.
        let mut results = Vec::with_capacity(posts.len());
        for post in &posts {
            let analysis = self.analyzer.analyze(post).await.map_err(|e| {
                tracing::warn!(post_id = %post.id, error = %e, "Post analysis failed, aborting batch");
                e
            })?;
            results.push(analysis);
        }

        Ok((results, next_cursor))
    }
}
