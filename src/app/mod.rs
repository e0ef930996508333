//! Caller-level chat state.
//!
//! [`ChatApp`] owns the active conversation and its message list, submits
//! queries through the [`StreamDriver`] and runs the sidebar operations
//! against a [`ConversationStore`]. It is UI-agnostic: progress is observed
//! through the optional [`StreamUpdate`] channel passed to [`ChatApp::submit`].

mod conversations;
mod notifications;

pub use notifications::{Notification, NotificationLevel};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::ChatApiClient;
use crate::error::ChatResult;
use crate::models::{Conversation, Message, QueryRequest};
use crate::stream::{SessionOutcome, StreamDriver, StreamUpdate};
use crate::traits::ConversationStore;

/// What a call to [`ChatApp::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or a query already in flight
    Ignored,
    /// The answer arrived in full
    Completed { message_id: String },
    /// The stream failed; the error is in the message list
    Failed { message: String },
}

/// Chat state for one signed-in user.
pub struct ChatApp {
    store: Arc<dyn ConversationStore>,
    driver: StreamDriver,
    conversations: Vec<Conversation>,
    active_conversation_id: Option<String>,
    messages: Vec<Message>,
    current_status: Option<String>,
    is_sending: bool,
    notifications: Vec<Notification>,
}

impl ChatApp {
    pub fn new(store: Arc<dyn ConversationStore>, driver: StreamDriver) -> Self {
        Self {
            store,
            driver,
            conversations: Vec::new(),
            active_conversation_id: None,
            messages: Vec::new(),
            current_status: None,
            is_sending: false,
            notifications: Vec::new(),
        }
    }

    /// Use the backend client both as store and as stream source.
    pub fn from_api(api: Arc<ChatApiClient>) -> Self {
        let store: Arc<dyn ConversationStore> = api.clone();
        Self::new(store, StreamDriver::new(api))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.active_conversation_id.as_deref()
    }

    pub fn current_status(&self) -> Option<&str> {
        self.current_status.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Apply a snapshot published by the driver while a query runs.
    pub fn apply_update(&mut self, update: StreamUpdate) {
        self.messages = update.messages;
        self.current_status = update.status;
    }

    /// Send `input` as a query in the active conversation.
    ///
    /// The user message is appended before the stream opens. Without an
    /// active conversation a fresh id is sent, and the backend creates the
    /// conversation under it.
    ///
    /// Returns `Err` when no access token is stored; nothing but the user
    /// message is added in that case.
    pub async fn submit(
        &mut self,
        input: &str,
        updates: Option<mpsc::UnboundedSender<StreamUpdate>>,
    ) -> ChatResult<SubmitOutcome> {
        let query = input.trim();
        if query.is_empty() || self.is_sending {
            return Ok(SubmitOutcome::Ignored);
        }

        let conversation_id = self
            .active_conversation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let request = QueryRequest::new(query, conversation_id);

        self.messages.push(Message::user(query));
        self.is_sending = true;

        let result = self
            .driver
            .run(self.messages.clone(), &request, updates)
            .await;

        self.is_sending = false;
        self.current_status = None;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.notify_error("Query not sent", &err);
                return Err(err);
            }
        };

        self.messages = outcome.messages;
        match (outcome.result, outcome.failure) {
            (SessionOutcome::Completed, _) => {
                info!(message_id = %outcome.streaming_message_id, "Answer received");
                Ok(SubmitOutcome::Completed {
                    message_id: outcome.streaming_message_id,
                })
            }
            (SessionOutcome::Failed { message }, failure) => {
                match &failure {
                    Some(err) => {
                        warn!(
                            error = %err,
                            code = err.error_code(),
                            retryable = err.is_retryable(),
                            "Query failed"
                        );
                        self.notify(Notification::for_error(message.clone(), err));
                    }
                    None => self.notify(Notification::error(message.clone())),
                }
                Ok(SubmitOutcome::Failed { message })
            }
        }
    }
}
