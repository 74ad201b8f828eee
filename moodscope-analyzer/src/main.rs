//! moodscope-analyzer service entry point.

use anyhow::Result;
use moodscope_analyzer::{
    build_router, serve, AppState, BatchAnalyzer, InferenceClassifier, OpenAiSummarizer,
    PostAnalyzer, TwitterClient,
};
use moodscope_common::config::Config;
use moodscope_common::logging::init_logging;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_and_validate()?;
    init_logging(&config.observability);

    tracing::info!("Moodscope Analyzer v{}", env!("CARGO_PKG_VERSION"));

    for field in config.missing_credentials() {
        tracing::warn!(field, "Credential not configured; dependent calls will be rejected upstream");
    }

    // Classifiers are loaded once and shared read-only across requests
    let classifiers = &config.classifiers;
    let classifier_timeout = Duration::from_secs(classifiers.timeout_secs);
    let severity = Arc::new(InferenceClassifier::new(
        &classifiers.base_url,
        &classifiers.severity_model,
        classifiers.api_token.as_deref(),
        classifier_timeout,
    ));
    let sentiment = Arc::new(InferenceClassifier::new(
        &classifiers.base_url,
        &classifiers.sentiment_model,
        classifiers.api_token.as_deref(),
        classifier_timeout,
    ));

    let source = Arc::new(TwitterClient::with_base_url(
        config.twitter.bearer_token.as_deref(),
        &config.twitter.base_url,
        Duration::from_secs(config.twitter.timeout_secs),
    ));

    let summarizer = Arc::new(OpenAiSummarizer::with_base_url(
        config.summarizer.api_key.as_deref(),
        &config.summarizer.base_url,
        &config.summarizer.model,
        Duration::from_secs(config.summarizer.timeout_secs),
    ));

    let analyzer = BatchAnalyzer::new(
        source,
        PostAnalyzer::new(severity, sentiment),
        summarizer,
    );

    // Build router with CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(AppState::new(analyzer)).layer(cors);

    let addr = config.listen_addr();

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, app, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, draining connections");
}
