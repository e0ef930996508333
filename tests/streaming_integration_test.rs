//! End-to-end streaming over a real HTTP connection.

mod common;

use std::time::{Duration, Instant};

use common::{answer_body, frame, live_driver};
use ragchat::error::{ChatError, NetworkError};
use ragchat::models::{Message, QueryRequest};
use ragchat::stream::{SessionOutcome, CANCELLED_DESCRIPTION};
use tokio::sync::{mpsc, watch};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

#[tokio::test]
async fn test_answer_streams_into_message_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(serde_json::json!({
            "query": "what is it?",
            "conversation_id": "c1"
        })))
        .respond_with(sse(answer_body("Searching...", &["The ", "answer is 42."])))
        .expect(1)
        .mount(&server)
        .await;

    let driver = live_driver(&server.uri(), "tok");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let outcome = driver
        .run(
            vec![Message::user("what is it?")],
            &QueryRequest::new("what is it?", "c1"),
            Some(tx),
        )
        .await
        .unwrap();

    assert_eq!(outcome.result, SessionOutcome::Completed);
    assert_eq!(outcome.messages.len(), 2);
    let answer = &outcome.messages[1];
    assert_eq!(answer.text, "The answer is 42.");
    assert!(!answer.is_streaming);
    assert!(!answer.is_error);

    let mut saw_status = false;
    while let Ok(update) = rx.try_recv() {
        saw_status |= update.status.as_deref() == Some("Searching...");
        assert!(update.messages.iter().filter(|m| m.is_streaming).count() <= 1);
    }
    assert!(saw_status);
}

#[tokio::test]
async fn test_error_event_without_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(sse(frame("error", Some("upstream unavailable"))))
        .mount(&server)
        .await;

    let outcome = live_driver(&server.uri(), "tok")
        .run(Vec::new(), &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();

    assert_eq!(outcome.error(), Some("upstream unavailable"));
    assert_eq!(outcome.messages.len(), 1);
    assert!(outcome.messages[0].is_error);
    assert!(!outcome.messages[0].is_streaming);
    assert!(outcome.messages[0].text.contains("upstream unavailable"));
}

#[tokio::test]
async fn test_error_status_uses_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({"message": "Index is rebuilding"})),
        )
        .mount(&server)
        .await;

    let outcome = live_driver(&server.uri(), "tok")
        .run(vec![Message::user("q")], &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();

    assert_eq!(outcome.error(), Some("Index is rebuilding"));
    assert_eq!(outcome.messages[1].text, "Error: Index is rebuilding");
}

#[tokio::test]
async fn test_error_status_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = live_driver(&server.uri(), "tok")
        .run(Vec::new(), &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();
    assert_eq!(outcome.error(), Some("HTTP error! status: 500"));
}

#[tokio::test]
async fn test_malformed_and_unknown_frames_tolerated() {
    let server = MockServer::start().await;
    let mut body = String::from("data: {not valid json}\n");
    body.push_str(": keep-alive comment\n\n");
    body.push_str(&frame("sources", Some("ignored")));
    body.push_str(&frame("content", Some("still here")));
    body.push_str(&frame("done", None));
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(sse(body))
        .mount(&server)
        .await;

    let outcome = live_driver(&server.uri(), "tok")
        .run(Vec::new(), &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.malformed_frames, 1);
    assert_eq!(outcome.messages.len(), 1);
    assert_eq!(outcome.messages[0].text, "still here");
}

#[tokio::test]
async fn test_body_without_done_or_trailing_newline() {
    let server = MockServer::start().await;
    let mut body = frame("content", Some("complete"));
    body.push_str("data: {\"type\":\"content\",\"message\":\" cut");
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(sse(body))
        .mount(&server)
        .await;

    let outcome = live_driver(&server.uri(), "tok")
        .run(Vec::new(), &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.messages[0].text, "complete");
    assert!(!outcome.messages[0].is_streaming);
}

#[tokio::test]
async fn test_connection_refused_is_reported_in_messages() {
    let outcome = live_driver("http://127.0.0.1:9", "tok")
        .run(vec![Message::user("q")], &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.messages.len(), 2);
    assert!(outcome.messages[1].is_error);
    assert!(outcome.messages[1].text.starts_with("Error: "));
}

#[tokio::test]
async fn test_cancel_while_waiting_for_response_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retriever/query"))
        .respond_with(sse(frame("done", None)).set_delay(Duration::from_secs(20)))
        .mount(&server)
        .await;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = cancel_tx.send(true);
    });

    let started = Instant::now();
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        live_driver(&server.uri(), "tok").run_with_cancel(
            vec![Message::user("q")],
            &QueryRequest::new("q", "c1"),
            None,
            cancel_rx,
        ),
    )
    .await
    .expect("cancel stops a request that is still opening")
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.error(), Some(CANCELLED_DESCRIPTION));
    assert_eq!(outcome.failure, Some(ChatError::Network(NetworkError::Cancelled)));
    assert_eq!(outcome.messages.len(), 2);
    assert_eq!(outcome.messages[1].text, "Error: Request cancelled");
    assert!(outcome.messages[1].is_error);
    assert!(!outcome.messages[1].is_streaming);
}
