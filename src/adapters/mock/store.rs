//! In-memory conversation store for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::{ChatError, ChatResult, NetworkError};
use crate::models::{sort_by_recent, Conversation, Message};
use crate::traits::ConversationStore;

#[derive(Debug, Default)]
struct StoreState {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    fail_with: Option<ChatError>,
}

/// In-memory [`ConversationStore`].
///
/// Clones share state. `set_failure` makes every operation fail with the
/// given error until cleared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a conversation.
    pub fn insert(&self, conversation: Conversation) {
        let mut state = self.state.lock().unwrap();
        state.conversations.retain(|c| c.id != conversation.id);
        state.conversations.push(conversation);
    }

    /// Set the stored messages of a conversation.
    pub fn set_messages(&self, id: &str, messages: Vec<Message>) {
        let mut state = self.state.lock().unwrap();
        state.messages.insert(id.to_string(), messages);
    }

    /// Make every operation fail with `err`, or succeed again with `None`.
    pub fn set_failure(&self, err: Option<ChatError>) {
        self.state.lock().unwrap().fail_with = err;
    }

    /// Snapshot of the stored conversations, in insertion order.
    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().unwrap().conversations.clone()
    }

    fn check(&self) -> ChatResult<()> {
        match &self.state.lock().unwrap().fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> ChatError {
        ChatError::Network(NetworkError::HttpStatus {
            status: 404,
            message: format!("Conversation {} not found", id),
        })
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn list(&self) -> ChatResult<Vec<Conversation>> {
        self.check()?;
        let mut conversations = self.conversations();
        sort_by_recent(&mut conversations);
        Ok(conversations)
    }

    async fn create(&self, title: &str) -> ChatResult<String> {
        self.check()?;
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        self.insert(Conversation {
            id: id.clone(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
            user_id: None,
        });
        Ok(id)
    }

    async fn rename(&self, id: &str, title: &str) -> ChatResult<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let conversation = state
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        conversation.title = title.to_string();
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> ChatResult<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let before = state.conversations.len();
        state.conversations.retain(|c| c.id != id);
        if state.conversations.len() == before {
            return Err(Self::not_found(id));
        }
        state.messages.remove(id);
        Ok(())
    }

    async fn fetch_messages(&self, id: &str) -> ChatResult<Vec<Message>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.messages.get(id).cloned().unwrap_or_default())
    }
}
