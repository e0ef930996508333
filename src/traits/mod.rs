//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, DELETE, streaming)
//! - [`CredentialsProvider`] - Credentials storage and retrieval
//! - [`ConversationStore`] - Conversation CRUD

pub mod credentials;
pub mod http;
pub mod store;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use store::ConversationStore;
