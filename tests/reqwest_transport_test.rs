//! The reqwest transport against a real HTTP server.

mod common;

use std::sync::Arc;

use common::*;
use convo_stream::adapters::ReqwestHttpClient;
use convo_stream::cache::ConversationStore;
use convo_stream::{
    AttemptOutcome, Conversation, MessageRole, SendOptions, StreamConfig, StreamError,
    StreamOrchestrator,
};
use futures::StreamExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(frames: &[String]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(frames.concat())
}

fn orchestrator_for(
    server: &MockServer,
) -> (Arc<ConversationStore>, RecordingNotifier, StreamOrchestrator) {
    init_tracing();
    let store = Arc::new(ConversationStore::new());
    store.insert(Conversation::new("c1"));
    let notifier = RecordingNotifier::new();
    let orchestrator = StreamOrchestrator::new(
        StreamConfig::default()
            .with_base_url(server.uri())
            .with_auth_token("jeton"),
        Arc::new(ReqwestHttpClient::new()),
        store.clone(),
        Arc::new(notifier.clone()),
    );
    (store, notifier, orchestrator)
}

#[tokio::test]
async fn test_post_stream_delivers_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse_body(&[common::frame("chunk", "a")]))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new();
    let body = client
        .post_stream(&format!("{}/stream", server.uri()), "{}", &Headers::new())
        .await
        .unwrap();
    let bytes: Vec<u8> = body
        .map(|chunk| chunk.unwrap().to_vec())
        .concat()
        .await;

    assert_eq!(String::from_utf8(bytes).unwrap(), common::frame("chunk", "a"));
}

#[tokio::test]
async fn test_post_stream_non_success_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("indisponible"))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new();
    let result = client
        .post_stream(&format!("{}/stream", server.uri()), "{}", &Headers::new())
        .await;

    match result {
        Err(HttpError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "indisponible");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected an error"),
    }
}

#[tokio::test]
async fn test_orchestrator_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/c1/stream"))
        .and(header("accept", "text/event-stream"))
        .and(header("authorization", "Bearer jeton"))
        .and(body_json(serde_json::json!({
            "content": "Bonjour",
            "skipSaveUserMessage": false
        })))
        .respond_with(sse_body(&[
            frame("chunk", "Salut"),
            frame("chunk", " coach"),
            frame("done", ""),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let (store, notifier, orchestrator) = orchestrator_for(&server);

    let outcome = orchestrator.send("c1", "Bonjour", SendOptions::default()).await;

    assert_eq!(outcome, AttemptOutcome::Completed);
    let messages = store.get("c1").unwrap().messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[1].content, "Salut coach");
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn test_orchestrator_http_failure_rolls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (store, notifier, orchestrator) = orchestrator_for(&server);

    let outcome = orchestrator.send("c1", "Bonjour", SendOptions::default()).await;

    assert!(matches!(
        outcome,
        AttemptOutcome::Failed(StreamError::Transport(HttpError::ServerError { status: 500, .. }))
    ));
    assert!(store.get("c1").unwrap().messages.is_empty());
    assert_eq!(notifier.count(), 1);
}
