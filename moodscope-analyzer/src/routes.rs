//! HTTP API routes.

use crate::error::AnalysisError;
use crate::models::PostAnalysis;
use crate::pipeline::BatchAnalyzer;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use moodscope_common::logging::trace_id_from_headers;
use moodscope_common::request_span;
use serde::Deserialize;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::Instrument;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: BatchAnalyzer,
}

impl AppState {
    pub fn new(analyzer: BatchAnalyzer) -> Self {
        Self { analyzer }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Analysis
        .route("/analyze", post(analyze))
        .route("/load-more-tweets", post(load_more))
        .route("/chatgpt-analysis", post(summarize))
        // Profile
        .route("/fetch-profile", get(fetch_profile))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves, then drain
/// in-flight requests.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "moodscope-analyzer",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ Analysis ============

/// Body for `/analyze` and `/load-more-tweets`.
///
/// A caller-supplied `num_tweets` is accepted and ignored; batches are
/// always five posts.
#[derive(Debug, Deserialize)]
struct BatchRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    pagination_token: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AnalysisError> {
    let Json(request) = payload?;
    let username = request.username.unwrap_or_default();
    let span = request_span!(
        "analyze",
        trace_id_from_headers(&headers),
        username = %username
    );

    async move {
        tracing::info!("Received request to analyze tweets");
        let report = state
            .analyzer
            .analyze_user_batch(&username, request.pagination_token)
            .await?;
        Ok::<_, AnalysisError>(Json(report))
    }
    .instrument(span)
    .await
}

async fn load_more(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AnalysisError> {
    let Json(request) = payload?;
    let username = request.username.unwrap_or_default();
    let span = request_span!(
        "load_more",
        trace_id_from_headers(&headers),
        username = %username
    );

    async move {
        let report = state
            .analyzer
            .analyze_next_batch(&username, request.pagination_token)
            .await?;
        Ok::<_, AnalysisError>(Json(report))
    }
    .instrument(span)
    .await
}

// ============ Summary ============

/// `tweet_data` may be absent or null; both count as no tweets.
#[derive(Debug, Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    tweet_data: Option<Vec<PostAnalysis>>,
}

async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AnalysisError> {
    let Json(request) = payload?;
    let tweet_data = request.tweet_data.unwrap_or_default();
    let span = request_span!(
        "summarize",
        trace_id_from_headers(&headers),
        posts = tweet_data.len()
    );

    async move {
        let report = state.analyzer.summarize(&tweet_data).await?;
        Ok::<_, AnalysisError>(Json(report))
    }
    .instrument(span)
    .await
}

// ============ Profile ============

#[derive(Debug, Deserialize)]
struct ProfileQuery {
    username: Option<String>,
}

async fn fetch_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProfileQuery>,
) -> Result<impl IntoResponse, AnalysisError> {
    let username = query.username.unwrap_or_default();
    let span = request_span!(
        "fetch_profile",
        trace_id_from_headers(&headers),
        username = %username
    );

    async move {
        let profile = state.analyzer.fetch_profile(&username).await?;
        Ok::<_, AnalysisError>(Json(profile))
    }
    .instrument(span)
    .await
}
