//! Post sources: where timelines come from.

mod twitter;

pub use twitter::TwitterClient;

use async_trait::async_trait;

use crate::models::{PostBatch, UserProfile, UserRef};

/// Error from a post source.
///
/// Rate limiting and credential failures are separate kinds so callers
/// never mistake them for an exhausted timeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("rate limited by upstream")]
    RateLimited,

    #[error("upstream rejected credentials")]
    Unauthorized,

    #[error("{0}")]
    Upstream(String),
}

/// Social-media timeline access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Resolve a username. `Ok(None)` when the account does not exist.
    async fn lookup_user(&self, username: &str) -> Result<Option<UserRef>, SourceError>;

    /// Fetch up to `page_size` posts, resuming at `cursor` when given.
    async fn fetch_posts(
        &self,
        user_id: &str,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PostBatch, SourceError>;

    /// Public profile details. `Ok(None)` when the account does not exist.
    async fn fetch_profile(&self, username: &str) -> Result<Option<UserProfile>, SourceError>;
}
