//! End-to-end tool calls through the registry, with the YouTube API mocked
//! by `wiremock` and the built-in lexicon classifier doing the scoring.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytsent_sentiment::{
    Aggregator, Classification, Classifier, LexiconClassifier, SentimentError, ToolError,
    ToolRegistry, Toolkit, YouTubeClient, COMMENT_TOOL_NAME, SENTIMENT_TOOL_NAME,
};

const VIDEO: &str = "https://youtu.be/KxaPYhfJV4U";

struct BrokenClassifier;

#[async_trait]
impl Classifier for BrokenClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, SentimentError> {
        Err(SentimentError::Classifier("model not loaded".to_string()))
    }
}

async fn mock_comments(server: &MockServer, texts: &[&str]) {
    let items: Vec<_> = texts
        .iter()
        .map(|t| json!({ "snippet": { "topLevelComment": { "snippet": { "textOriginal": t } } } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "KxaPYhfJV4U"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

fn registry(server: &MockServer, classifier: Arc<dyn Classifier>) -> ToolRegistry {
    let source = YouTubeClient::new(&server.uri(), "test-key", 5, "ytsent-test/0.1")
        .expect("build client");
    Toolkit::new(
        Arc::new(source),
        Aggregator::new(classifier),
        50,
        Duration::from_secs(5),
    )
    .registry()
}

#[tokio::test]
async fn comment_tool_renders_header_and_lines() {
    let server = MockServer::start().await;
    mock_comments(&server, &["Love this!", "Terrible audio", "Great explanation"]).await;

    let registry = registry(&server, Arc::new(LexiconClassifier::new()));
    let out = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": VIDEO, "max_comments": 2 }))
        .await
        .expect("tool call");

    assert!(!out.is_error);
    assert_eq!(
        out.content,
        "These are the top 2 comments from the video:\nLove this!\nTerrible audio"
    );
}

#[tokio::test]
async fn comment_tool_reports_zero_comments() {
    let server = MockServer::start().await;
    mock_comments(&server, &[]).await;

    let registry = registry(&server, Arc::new(LexiconClassifier::new()));
    let out = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": VIDEO }))
        .await
        .expect("tool call");

    assert_eq!(out.content, "These are the top 0 comments from the video:\n");
}

#[tokio::test]
async fn negative_cap_returns_empty_batch_without_calling_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let registry = registry(&server, Arc::new(LexiconClassifier::new()));
    let out = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": VIDEO, "max_comments": -5 }))
        .await
        .expect("tool call");

    assert!(!out.is_error);
    assert_eq!(out.content, "These are the top 0 comments from the video:\n");
}

#[tokio::test]
async fn comment_output_feeds_the_sentiment_tool() {
    let server = MockServer::start().await;
    mock_comments(
        &server,
        &["Love this!", "Terrible audio", "Great explanation"],
    )
    .await;

    let registry = registry(&server, Arc::new(LexiconClassifier::new()));
    let comments = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": VIDEO }))
        .await
        .expect("comment call");
    let verdict = registry
        .execute(SENTIMENT_TOOL_NAME, json!({ "comments": comments.content }))
        .await
        .expect("sentiment call");

    assert!(!verdict.is_error);
    assert_eq!(
        verdict.content,
        "The overall reception is positive. Positive comments: 2, Negative comments: 1."
    );
}

#[tokio::test]
async fn empty_comments_are_neutral() {
    let server = MockServer::start().await;
    let registry = registry(&server, Arc::new(LexiconClassifier::new()));

    let out = registry
        .execute(SENTIMENT_TOOL_NAME, json!({ "comments": "" }))
        .await
        .expect("sentiment call");

    assert_eq!(
        out.content,
        "The overall reception is neutral. Positive comments: 0, Negative comments: 0."
    );
}

#[tokio::test]
async fn api_failure_becomes_fetch_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "The video identified by the videoId parameter could not be found.",
                "errors": [{ "reason": "videoNotFound" }]
            }
        })))
        .mount(&server)
        .await;

    let registry = registry(&server, Arc::new(LexiconClassifier::new()));
    let out = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": VIDEO }))
        .await
        .expect("tool call");

    assert!(out.is_error);
    assert!(
        out.content.starts_with("Error fetching comments: "),
        "got: {}",
        out.content
    );
    assert!(out.content.contains("videoNotFound"), "got: {}", out.content);
}

#[tokio::test]
async fn invalid_link_becomes_fetch_error_text() {
    let server = MockServer::start().await;
    let registry = registry(&server, Arc::new(LexiconClassifier::new()));

    let out = registry
        .execute(COMMENT_TOOL_NAME, json!({ "link": "not a video" }))
        .await
        .expect("tool call");

    assert!(out.is_error);
    assert!(out.content.starts_with("Error fetching comments: "));
}

#[tokio::test]
async fn classifier_failure_becomes_analysis_error_text() {
    let server = MockServer::start().await;
    let registry = registry(&server, Arc::new(BrokenClassifier));

    let out = registry
        .execute(SENTIMENT_TOOL_NAME, json!({ "comments": "fine\nalso fine" }))
        .await
        .expect("tool call");

    assert!(out.is_error);
    assert_eq!(
        out.content,
        "Error during sentiment analysis: classifier error: model not loaded"
    );
}

#[tokio::test]
async fn missing_required_argument_is_a_call_error() {
    let server = MockServer::start().await;
    let registry = registry(&server, Arc::new(LexiconClassifier::new()));

    let err = registry
        .execute(COMMENT_TOOL_NAME, json!({ "max_comments": 5 }))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments { .. }), "got: {err:?}");
}

#[tokio::test]
async fn unknown_tool_is_a_call_error() {
    let server = MockServer::start().await;
    let registry = registry(&server, Arc::new(LexiconClassifier::new()));

    let err = registry
        .execute("final_answer", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "final_answer"));
}
