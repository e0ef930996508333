//! Sidebar operations: listing, selecting, creating, renaming, deleting.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::ChatApp;
use crate::error::ChatResult;
use crate::models::{filter_by_title, group_by_time_label, Conversation, TimeLabel};

impl ChatApp {
    /// Reload the conversation list from the store.
    pub async fn refresh_conversations(&mut self) -> ChatResult<()> {
        match self.store.list().await {
            Ok(conversations) => {
                debug!(count = conversations.len(), "Conversations refreshed");
                self.conversations = conversations;
                Ok(())
            }
            Err(err) => {
                self.notify_error("Failed to load conversations", &err);
                Err(err)
            }
        }
    }

    /// Make `id` the active conversation and load its messages.
    ///
    /// On failure the message list is left empty.
    pub async fn select_conversation(&mut self, id: &str) -> ChatResult<()> {
        self.active_conversation_id = Some(id.to_string());
        self.current_status = None;
        match self.store.fetch_messages(id).await {
            Ok(messages) => {
                self.messages = messages;
                Ok(())
            }
            Err(err) => {
                self.messages.clear();
                self.notify_error("Failed to load messages", &err);
                Err(err)
            }
        }
    }

    /// Leave the active conversation; the next query starts a new one.
    pub fn start_new_conversation(&mut self) {
        self.active_conversation_id = None;
        self.messages.clear();
        self.current_status = None;
    }

    /// Create a conversation and make it active.
    pub async fn create_conversation(&mut self, title: &str) -> ChatResult<String> {
        let id = match self.store.create(title.trim()).await {
            Ok(id) => id,
            Err(err) => {
                self.notify_error("Failed to create conversation", &err);
                return Err(err);
            }
        };
        info!(id = %id, "Conversation created");
        self.active_conversation_id = Some(id.clone());
        self.messages.clear();
        self.refresh_conversations().await?;
        Ok(id)
    }

    /// Rename a conversation. Returns false when there was nothing to change.
    pub async fn rename_conversation(&mut self, id: &str, title: &str) -> ChatResult<bool> {
        let title = title.trim();
        let unchanged = self
            .conversations
            .iter()
            .any(|c| c.id == id && c.title == title);
        if title.is_empty() || unchanged {
            return Ok(false);
        }

        if let Err(err) = self.store.rename(id, title).await {
            self.notify_error("Failed to rename conversation", &err);
            return Err(err);
        }
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.title = title.to_string();
        }
        Ok(true)
    }

    /// Delete a conversation.
    ///
    /// Deleting the active conversation activates the first remaining one,
    /// or none.
    pub async fn delete_conversation(&mut self, id: &str) -> ChatResult<()> {
        if let Err(err) = self.store.delete(id).await {
            self.notify_error("Failed to delete conversation", &err);
            return Err(err);
        }
        self.conversations.retain(|c| c.id != id);
        info!(id = %id, "Conversation deleted");

        if self.active_conversation_id.as_deref() == Some(id) {
            match self.conversations.first().map(|c| c.id.clone()) {
                Some(next) => self.select_conversation(&next).await?,
                None => self.start_new_conversation(),
            }
        }
        Ok(())
    }

    /// Conversations matching `query`, grouped by age relative to `now`.
    pub fn sidebar(&self, query: &str, now: DateTime<Utc>) -> Vec<(TimeLabel, Vec<&Conversation>)> {
        group_by_time_label(filter_by_title(&self.conversations, query), now)
    }
}
