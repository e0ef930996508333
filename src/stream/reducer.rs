//! Message store reducer.
//!
//! Applies [`MessageInstruction`]s to an ordered message list and returns the
//! new list. The input slice is never mutated, so a caller can keep rendering
//! the old snapshot while the next one is built.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{Message, Sender};

/// How an instruction treats a missing target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Create the message at the end of the list if no message has the id
    Upsert,
    /// Only touch an existing message; no-op if absent
    UpdateOnly,
}

/// A change to one message, addressed by id.
///
/// `None` fields are left untouched on update and take their defaults on
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInstruction {
    pub id: String,
    pub mode: ApplyMode,
    pub text: Option<String>,
    pub is_streaming: Option<bool>,
    pub is_error: Option<bool>,
    /// Timestamp given to the message if this instruction creates it
    pub timestamp: DateTime<Utc>,
}

impl MessageInstruction {
    /// Create-or-update the live message with the full accumulated text.
    pub fn stream_content(
        id: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            mode: ApplyMode::Upsert,
            text: Some(text.into()),
            is_streaming: Some(true),
            is_error: None,
            timestamp,
        }
    }

    /// Clear the streaming flag without touching the text.
    pub fn finish(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: ApplyMode::UpdateOnly,
            text: None,
            is_streaming: Some(false),
            is_error: None,
            timestamp: Utc::now(),
        }
    }

    /// Turn the message into a terminal error, creating it if needed.
    pub fn fail(id: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            mode: ApplyMode::Upsert,
            text: Some(text.into()),
            is_streaming: Some(false),
            is_error: Some(true),
            timestamp,
        }
    }

    fn create(&self) -> Message {
        Message {
            id: self.id.clone(),
            sender: Sender::Ai,
            text: self.text.clone().unwrap_or_default(),
            timestamp: self.timestamp,
            is_streaming: self.is_streaming.unwrap_or(false),
            is_error: self.is_error.unwrap_or(false),
        }
    }

    fn merge_into(&self, message: &mut Message) {
        if let Some(text) = &self.text {
            message.text.clone_from(text);
        }
        if let Some(is_streaming) = self.is_streaming {
            message.is_streaming = is_streaming;
        }
        if let Some(is_error) = self.is_error {
            message.is_error = is_error;
        }
    }
}

/// Apply one instruction, returning the new message list.
///
/// - An existing message keeps its position; a created one is appended.
/// - A message already flagged as an error is left untouched.
/// - Marking a message as streaming clears the flag on every other message.
pub fn apply(messages: &[Message], instruction: &MessageInstruction) -> Vec<Message> {
    let mut next = messages.to_vec();

    match next.iter().position(|m| m.id == instruction.id) {
        Some(index) => {
            let target = &mut next[index];
            if target.is_error {
                debug!(id = %instruction.id, "Ignoring update to terminal error message");
                return next;
            }
            instruction.merge_into(target);
        }
        None => match instruction.mode {
            ApplyMode::Upsert => next.push(instruction.create()),
            ApplyMode::UpdateOnly => {
                debug!(id = %instruction.id, "Update target not found, skipping");
                return next;
            }
        },
    }

    if instruction.is_streaming == Some(true) {
        for message in next.iter_mut() {
            if message.is_streaming && message.id != instruction.id {
                warn!(
                    id = %message.id,
                    live = %instruction.id,
                    "Another message was still streaming, clearing its flag"
                );
                message.is_streaming = false;
            }
        }
    }

    next
}

/// Apply instructions in order.
pub fn apply_all<'a, I>(messages: &[Message], instructions: I) -> Vec<Message>
where
    I: IntoIterator<Item = &'a MessageInstruction>,
{
    instructions
        .into_iter()
        .fold(messages.to_vec(), |acc, instruction| apply(&acc, instruction))
}
