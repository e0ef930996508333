//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialsProvider`] - File-based credentials storage
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses and body streams
//! - [`mock::InMemoryCredentials`] - In-memory credential storage
//! - [`mock::InMemoryConversationStore`] - In-memory conversations

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialsProvider;
pub use mock::{InMemoryConversationStore, InMemoryCredentials, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
