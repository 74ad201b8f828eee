//! Paginated timeline fetching.

use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{PaginationCursor, PostBatch};
use crate::source::PostSource;

/// Posts requested per fetch. Callers cannot change it.
pub const BATCH_SIZE: u32 = 5;

/// "Next batch of posts" over a [`PostSource`].
///
/// Holds no pagination state of its own: the caller keeps the cursor and
/// hands it back on the next call.
#[derive(Clone)]
pub struct PostCursor {
    source: Arc<dyn PostSource>,
}

impl PostCursor {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self { source }
    }

    /// Fetch the batch after `cursor` (or the first batch when `None`).
    ///
    /// Posts come back in source order. An empty batch is
    /// [`AnalysisError::NoMorePosts`]; rate-limit and credential failures
    /// keep their own kinds.
    pub async fn fetch_next_batch(
        &self,
        username: &str,
        cursor: PaginationCursor,
    ) -> Result<PostBatch, AnalysisError> {
        let user = self
            .source
            .lookup_user(username)
            .await?
            .ok_or_else(|| AnalysisError::UserNotFound(username.to_string()))?;

        tracing::info!(username = %username, user_id = %user.id, "Resolved user");

        let batch = self
            .source
            .fetch_posts(&user.id, BATCH_SIZE, cursor)
            .await?;

        if batch.posts.is_empty() {
            tracing::warn!(username = %username, "No posts found");
            return Err(AnalysisError::NoMorePosts);
        }

        tracing::info!(
            username = %username,
            fetched = batch.posts.len(),
            has_next = batch.next_cursor.is_some(),
            "Fetched posts"
        );

        Ok(batch)
    }
}
