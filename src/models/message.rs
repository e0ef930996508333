use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{deserialize_id, deserialize_nullable_string, deserialize_timestamp};

/// Who authored a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Map a backend role string. Anything other than `user` is the assistant.
    pub fn from_role(role: &str) -> Self {
        if role == "user" {
            Sender::User
        } else {
            Sender::Ai
        }
    }
}

/// A conversation entry as held by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique within the conversation
    pub id: String,
    #[serde(rename = "from")]
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// True only for the live message of an in-flight query
    #[serde(default)]
    pub is_streaming: bool,
    /// Error messages are terminal and never receive more content
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    /// A user message with a fresh id, stamped now
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            is_streaming: false,
            is_error: false,
        }
    }

    /// A completed assistant message
    pub fn ai(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::Ai,
            text: text.into(),
            timestamp: Utc::now(),
            is_streaming: false,
            is_error: false,
        }
    }

    /// A standalone error message with a fresh id
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Ai,
            text: text.into(),
            timestamp: Utc::now(),
            is_streaming: false,
            is_error: true,
        }
    }
}

/// Message format from the server (different from client Message)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// `user`, `assistant`, `ai`, ...
    pub role: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ServerMessage {
    /// Convert a ServerMessage to a client Message.
    pub fn to_client_message(self) -> Message {
        Message {
            id: self.id,
            sender: Sender::from_role(&self.role),
            text: self.content,
            timestamp: self.created_at,
            is_streaming: false,
            is_error: false,
        }
    }
}

/// Convert persisted messages and order them by timestamp, oldest first.
///
/// The sort is stable so messages sharing a timestamp keep server order.
pub fn into_client_messages(messages: Vec<ServerMessage>) -> Vec<Message> {
    let mut messages: Vec<Message> = messages
        .into_iter()
        .map(ServerMessage::to_client_message)
        .collect();
    messages.sort_by_key(|m| m.timestamp);
    messages
}

/// Response body of the fetch-messages endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<ServerMessage>,
}
