//! Mock wiring shared by the integration tests.

pub use ragchat::adapters::mock::{
    InMemoryConversationStore, InMemoryCredentials, MockHttpClient, MockResponse,
};

use std::sync::Arc;

use ragchat::adapters::ReqwestHttpClient;
use ragchat::api::ChatApiClient;
use ragchat::stream::StreamDriver;

/// Backend URL the mock client is configured with
pub const MOCK_BASE: &str = "http://localhost:8000";

/// An API client over the mock HTTP client, holding `token`.
pub fn mock_api(mock: &MockHttpClient, token: &str) -> Arc<ChatApiClient> {
    Arc::new(ChatApiClient::new(
        Arc::new(mock.clone()),
        MOCK_BASE,
        Arc::new(InMemoryCredentials::with_token(token)),
    ))
}

/// An API client talking to a real server at `base_url`.
pub fn live_api(base_url: &str, token: &str) -> Arc<ChatApiClient> {
    Arc::new(ChatApiClient::new(
        Arc::new(ReqwestHttpClient::new()),
        base_url,
        Arc::new(InMemoryCredentials::with_token(token)),
    ))
}

/// A driver over a real server at `base_url`.
pub fn live_driver(base_url: &str, token: &str) -> StreamDriver {
    StreamDriver::new(live_api(base_url, token))
}
