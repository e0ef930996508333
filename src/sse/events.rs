//! Stream event types
//!
//! Typed events carried by `data:` frames of the query stream.

use serde::{Deserialize, Serialize};

/// Typed events from the query stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Progress indicator shown while the answer is being prepared
    Status { message: String },
    /// Answer chunk to append to the accumulated text
    Content { message: String },
    /// Stream completed successfully
    Done,
    /// Stream failed
    Error { message: String },
}

impl StreamEvent {
    /// Wire name of the event type
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::Content { .. } => "content",
            StreamEvent::Done => "done",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Whether this event closes the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error { .. })
    }
}

/// Errors from decoding a single `data:` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameParseError {
    /// Payload is not a JSON object with a string `type`
    InvalidJson { payload: String, source: String },
    /// `status`, `content` or `error` frame without a `message`
    MissingMessage { event_type: String },
}

impl std::fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameParseError::InvalidJson { payload, source } => {
                write!(f, "Invalid JSON in frame '{}': {}", payload, source)
            }
            FrameParseError::MissingMessage { event_type } => {
                write!(f, "Missing message for event type: {}", event_type)
            }
        }
    }
}

impl std::error::Error for FrameParseError {}
