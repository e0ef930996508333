//! Conversation store trait abstraction.
//!
//! CRUD over the user's conversations. The chat flow only depends on this
//! trait, so it can run against the HTTP backend or an in-memory store.

use async_trait::async_trait;

use crate::error::ChatResult;
use crate::models::{Conversation, Message};

/// Remote conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All conversations of the signed-in user, most recently updated first.
    async fn list(&self) -> ChatResult<Vec<Conversation>>;

    /// Create a conversation and return its id.
    async fn create(&self, title: &str) -> ChatResult<String>;

    /// Change a conversation's title.
    async fn rename(&self, id: &str, title: &str) -> ChatResult<()>;

    /// Delete a conversation and its messages.
    async fn delete(&self, id: &str) -> ChatResult<()>;

    /// Persisted messages of a conversation, oldest first.
    async fn fetch_messages(&self, id: &str) -> ChatResult<Vec<Message>>;
}
