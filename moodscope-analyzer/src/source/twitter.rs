//! X (Twitter) API v2 client.

use super::{PostSource, SourceError};
use crate::models::{Post, PostBatch, PostReference, UserProfile, UserRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const TWEET_FIELDS: &str = "text,referenced_tweets";
const TWEET_EXPANSIONS: &str = "referenced_tweets.id,referenced_tweets.id.author_id";
const PROFILE_FIELDS: &str = "created_at,public_metrics,description";

/// App-only (bearer token) client for the X API.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
}

impl TwitterClient {
    pub fn new(bearer_token: Option<&str>, timeout: Duration) -> Self {
        Self::with_base_url(bearer_token, "https://api.twitter.com", timeout)
    }

    /// Create with a custom base URL (proxies, test servers).
    pub fn with_base_url(
        bearer_token: Option<&str>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(token) = bearer_token.filter(|t| !t.is_empty()) {
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
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::Upstream(format!("Request failed: {}", e)))?;

        let Some(response) = check_status(response).await? else {
            return Ok(None);
        };

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| SourceError::Upstream(format!("Failed to parse response: {}", e)))
    }

    async fn get_user<T: DeserializeOwned>(
        &self,
        username: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, SourceError> {
        let path = format!("/2/users/by/username/{}", username);
        let envelope: Option<DataEnvelope<T>> = self.get_json(&path, query).await?;
        Ok(envelope.and_then(|e| e.data))
    }
}

/// Map HTTP status to source errors. `Ok(None)` for 404.
async fn check_status(response: Response) -> Result<Option<Response>, SourceError> {
    let status = response.status();
    match status {
        s if s.is_success() => Ok(Some(response)),
        StatusCode::NOT_FOUND => Ok(None),
        StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimited),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::Unauthorized),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(SourceError::Upstream(format!(
                "X API error ({}): {}",
                status.as_u16(),
                body
            )))
        }
    }
}

#[async_trait]
impl PostSource for TwitterClient {
    async fn lookup_user(&self, username: &str) -> Result<Option<UserRef>, SourceError> {
        let user: Option<UserData> = self.get_user(username, &[]).await?;
        Ok(user.map(|u| UserRef {
            id: u.id,
            username: u.username,
        }))
    }

    async fn fetch_posts(
        &self,
        user_id: &str,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PostBatch, SourceError> {
        let path = format!("/2/users/{}/tweets", user_id);
        let mut query = vec![
            ("max_results", page_size.to_string()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("expansions", TWEET_EXPANSIONS.to_string()),
        ];
        if let Some(token) = cursor {
            query.push(("pagination_token", token));
        }

        let timeline: Option<TimelineResponse> = self.get_json(&path, &query).await?;
        let Some(timeline) = timeline else {
            return Ok(PostBatch::default());
        };

        let posts = timeline
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|t| Post {
                id: t.id,
                text: t.text,
                references: t.referenced_tweets.unwrap_or_default(),
            })
            .collect();

        Ok(PostBatch {
            posts,
            next_cursor: timeline.meta.and_then(|m| m.next_token),
        })
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<UserProfile>, SourceError> {
        let query = [("user.fields", PROFILE_FIELDS.to_string())];
        let user: Option<ProfileData> = self.get_user(username, &query).await?;

        Ok(user.map(|u| {
            let metrics = u.public_metrics.unwrap_or_default();
            UserProfile {
                username: u.username,
                bio: u
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "No bio available.".to_string()),
                followers_count: metrics.followers_count,
                following_count: metrics.following_count,
                created_at: u
                    .created_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "Unknown".to_string()),
            }
        }))
    }
}

// ============================================================================
// X API Types
// ============================================================================

/// Lookups answer 200 with only `errors` when the account is missing.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    username: String,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
    public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    following_count: u64,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    data: Option<Vec<TweetData>>,
    meta: Option<TimelineMeta>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
    referenced_tweets: Option<Vec<PostReference>>,
}

#[derive(Debug, Deserialize)]
struct TimelineMeta {
    next_token: Option<String>,
}
