//! HTTP client tests against mock upstream servers.

use std::time::Duration;

use moodscope_analyzer::{
    ClassifierError, InferenceClassifier, OpenAiSummarizer, PostSource, SeverityClassifier,
    SourceError, Summarizer, TwitterClient,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

// ─────────────────────────────────────────────────────────────────────────────
// X API
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_twitter_lookup_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/by/username/jack"))
        .and(header("authorization", "Bearer x-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "12", "name": "jack", "username": "jack"}
        })))
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(Some("x-token"), server.uri(), TIMEOUT);
    let user = client.lookup_user("jack").await.unwrap().unwrap();

    assert_eq!(user.id, "12");
    assert_eq!(user.username, "jack");
}

#[tokio::test]
async fn test_twitter_lookup_missing_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/by/username/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"title": "Not Found Error", "detail": "Could not find user"}]
        })))
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(None, server.uri(), TIMEOUT);

    assert!(client.lookup_user("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_twitter_fetch_posts_with_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/12/tweets"))
        .and(query_param("max_results", "5"))
        .and(query_param("pagination_token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "1", "text": "first post"},
                {
                    "id": "2",
                    "text": "RT @someone: shared",
                    "referenced_tweets": [{"type": "retweeted", "id": "99"}]
                }
            ],
            "meta": {"result_count": 2, "next_token": "def"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(Some("x-token"), server.uri(), TIMEOUT);
    let batch = client
        .fetch_posts("12", 5, Some("abc".to_string()))
        .await
        .unwrap();

    assert_eq!(batch.posts.len(), 2);
    assert_eq!(batch.posts[0].text, "first post");
    assert!(!batch.posts[0].is_repost());
    assert!(batch.posts[1].is_repost());
    assert_eq!(batch.next_cursor.as_deref(), Some("def"));
}

#[tokio::test]
async fn test_twitter_empty_timeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/12/tweets"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
        )
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(None, server.uri(), TIMEOUT);
    let batch = client.fetch_posts("12", 5, None).await.unwrap();

    assert!(batch.posts.is_empty());
    assert!(batch.next_cursor.is_none());
}

#[tokio::test]
async fn test_twitter_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(Some("x-token"), server.uri(), TIMEOUT);
    let err = client.fetch_posts("12", 5, None).await.unwrap_err();

    assert!(matches!(err, SourceError::RateLimited));
}

#[tokio::test]
async fn test_twitter_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(Some("stale"), server.uri(), TIMEOUT);
    let err = client.lookup_user("jack").await.unwrap_err();

    assert!(matches!(err, SourceError::Unauthorized));
}

#[tokio::test]
async fn test_twitter_profile_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/by/username/jack"))
        .and(query_param("user.fields", "created_at,public_metrics,description"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "12",
                "username": "jack",
                "description": "",
                "public_metrics": {"followers_count": 7, "following_count": 3}
            }
        })))
        .mount(&server)
        .await;

    let client = TwitterClient::with_base_url(None, server.uri(), TIMEOUT);
    let profile = client.fetch_profile("jack").await.unwrap().unwrap();

    assert_eq!(profile.bio, "No bio available.");
    assert_eq!(profile.followers_count, 7);
    assert_eq!(profile.following_count, 3);
    assert_eq!(profile.created_at, "Unknown");
}

// ─────────────────────────────────────────────────────────────────────────────
// Inference API
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_inference_picks_top_label() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/org/severity-model"))
        .and(header("authorization", "Bearer hf-token"))
        .and(body_partial_json(json!({"inputs": "I can't sleep anymore"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            {"label": "not depression", "score": 0.1},
            {"label": "severe", "score": 0.7},
            {"label": "moderate", "score": 0.2}
        ]])))
        .mount(&server)
        .await;

    let classifier =
        InferenceClassifier::new(server.uri(), "org/severity-model", Some("hf-token"), TIMEOUT);
    let prediction = classifier
        .classify_severity("I can't sleep anymore")
        .await
        .unwrap();

    assert_eq!(prediction.label, "severe");
    assert!((prediction.score - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_inference_accepts_flat_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"label": "positive", "score": 0.6},
            {"label": "negative", "score": 0.4}
        ])))
        .mount(&server)
        .await;

    let classifier = InferenceClassifier::new(server.uri(), "sentiment", None, TIMEOUT);

    assert_eq!(classifier.classify("nice").await.unwrap().label, "positive");
}

#[tokio::test]
async fn test_inference_model_loading_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model is currently loading",
            "estimated_time": 20.0
        })))
        .mount(&server)
        .await;

    let classifier = InferenceClassifier::new(server.uri(), "severity", None, TIMEOUT);
    let err = classifier.classify("text").await.unwrap_err();

    match err {
        ClassifierError::Api { status, message, .. } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Model is currently loading");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_inference_empty_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[]])))
        .mount(&server)
        .await;

    let classifier = InferenceClassifier::new(server.uri(), "severity", None, TIMEOUT);

    assert!(matches!(
        classifier.classify("text").await,
        Err(ClassifierError::Malformed { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat completions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openai_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "be helpful"},
                {"role": "user", "content": "summarise this"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "A summary."}}
            ]
        })))
        .mount(&server)
        .await;

    let summarizer =
        OpenAiSummarizer::with_base_url(Some("sk-test"), server.uri(), "gpt-4", TIMEOUT);
    let text = summarizer
        .complete("be helpful", "summarise this")
        .await
        .unwrap();

    assert_eq!(text, "A summary.");
}

#[tokio::test]
async fn test_openai_no_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let summarizer = OpenAiSummarizer::with_base_url(None, server.uri(), "gpt-4", TIMEOUT);
    let err = summarizer.complete("sys", "prompt").await.unwrap_err();

    assert_eq!(err.provider, "openai");
    assert!(err.status_code.is_none());
}

#[tokio::test]
async fn test_openai_api_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let summarizer =
        OpenAiSummarizer::with_base_url(Some("sk-bad"), server.uri(), "gpt-4", TIMEOUT);
    let err = summarizer.complete("sys", "prompt").await.unwrap_err();

    assert_eq!(err.status_code, Some(401));
    assert!(err.to_string().starts_with("[openai:gpt-4]"));
}
