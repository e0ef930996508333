//! Common test utilities for integration tests.

pub mod mocks;

pub use mocks::*;

use ragchat::auth::credentials::Credentials;

/// Credentials with a usable token.
pub fn test_credentials() -> Credentials {
    Credentials {
        access_token: Some("test-access-token-12345".to_string()),
        user_id: Some("test-user-id".to_string()),
        email: Some("tester@example.com".to_string()),
    }
}

/// One `data:` frame line, newline included.
pub fn frame(event_type: &str, message: Option<&str>) -> String {
    let payload = match message {
        Some(m) => serde_json::json!({"type": event_type, "message": m}),
        None => serde_json::json!({"type": event_type}),
    };
    format!("data: {}\n", payload)
}

/// The body of a successful answer: a status, the content chunks, done.
pub fn answer_body(status: &str, chunks: &[&str]) -> String {
    let mut body = frame("status", Some(status));
    for chunk in chunks {
        body.push_str(&frame("content", Some(chunk)));
    }
    body.push_str(&frame("done", None));
    body
}
