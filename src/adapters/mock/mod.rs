//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and streams
//! - [`InMemoryCredentials`] - In-memory credential storage
//! - [`InMemoryConversationStore`] - In-memory conversation store

pub mod credentials;
pub mod http;
pub mod store;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use store::InMemoryConversationStore;
