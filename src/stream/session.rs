//! Stream session and event interpreter.
//!
//! A [`StreamSession`] lives for one query. It folds [`StreamEvent`]s into
//! status, accumulated answer text and the identity of the live message, and
//! tells the reducer what to change through [`MessageInstruction`]s.
//!
//! ```text
//! Idle --status--> Awaiting --content--> Streaming --done--> Completed
//!   \                  \                     \
//!    +-----------------+--------error--------+-------------> Failed
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::sse::StreamEvent;
use crate::stream::reducer::MessageInstruction;

/// Prefix of the text shown in a failed message
pub const ERROR_TEXT_PREFIX: &str = "Error: ";

/// Format the text of an error message
pub fn error_text(message: &str) -> String {
    format!("{}{}", ERROR_TEXT_PREFIX, message)
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No event received yet
    #[default]
    Idle,
    /// Status received, no content yet
    Awaiting,
    /// At least one content chunk received
    Streaming,
    /// Closed by a done event or a natural end of stream
    Completed,
    /// Closed by an error event or a transport failure
    Failed,
}

impl SessionPhase {
    /// Whether the session is closed
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Failed)
    }
}

/// How a closed session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Failed { message: String },
}

/// Interpretation state of one query stream
#[derive(Debug, Clone)]
pub struct StreamSession {
    streaming_message_id: String,
    accumulated_text: String,
    current_status: Option<String>,
    phase: SessionPhase,
    /// Whether a message with `streaming_message_id` has been created
    materialized: bool,
    error: Option<String>,
}

impl StreamSession {
    /// Start a session with a fresh message id.
    pub fn new() -> Self {
        Self::with_message_id(Uuid::new_v4().to_string())
    }

    /// Start a session whose live message will use `id`.
    pub fn with_message_id(id: impl Into<String>) -> Self {
        Self {
            streaming_message_id: id.into(),
            accumulated_text: String::new(),
            current_status: None,
            phase: SessionPhase::Idle,
            materialized: false,
            error: None,
        }
    }

    pub fn streaming_message_id(&self) -> &str {
        &self.streaming_message_id
    }

    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn current_status(&self) -> Option<&str> {
        self.current_status.as_deref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether any instruction has targeted the live message yet
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Interpret one event.
    ///
    /// Returns the instruction for the reducer, if the event changes a
    /// message. Events after the session is closed are ignored.
    pub fn handle(&mut self, event: StreamEvent) -> Option<MessageInstruction> {
        if self.phase.is_terminal() {
            debug!(
                event_type = event.kind(),
                phase = ?self.phase,
                "Ignoring event after session closed"
            );
            return None;
        }

        match event {
            StreamEvent::Status { message } => {
                debug!(status = %message, "Stream status");
                self.current_status = Some(message);
                if self.phase == SessionPhase::Idle {
                    self.phase = SessionPhase::Awaiting;
                }
                None
            }
            StreamEvent::Content { message } => {
                self.current_status = None;
                self.accumulated_text.push_str(&message);
                self.phase = SessionPhase::Streaming;
                self.materialized = true;
                Some(MessageInstruction::stream_content(
                    self.streaming_message_id.clone(),
                    self.accumulated_text.clone(),
                    Utc::now(),
                ))
            }
            StreamEvent::Done => {
                self.current_status = None;
                self.phase = SessionPhase::Completed;
                info!(
                    id = %self.streaming_message_id,
                    chars = self.accumulated_text.chars().count(),
                    "Stream completed"
                );
                Some(MessageInstruction::finish(self.streaming_message_id.clone()))
            }
            StreamEvent::Error { message } => {
                self.current_status = None;
                self.phase = SessionPhase::Failed;
                warn!(id = %self.streaming_message_id, error = %message, "Stream failed");
                let text = error_text(&message);
                self.error = Some(message);
                self.materialized = true;
                Some(MessageInstruction::fail(
                    self.streaming_message_id.clone(),
                    text,
                    Utc::now(),
                ))
            }
        }
    }

    /// The stream ended without a terminal event: treat it as done.
    pub fn close_natural(&mut self) -> Option<MessageInstruction> {
        if self.phase.is_terminal() {
            return None;
        }
        debug!("Stream ended without a done event, closing session");
        self.handle(StreamEvent::Done)
    }

    /// The transport failed: route the failure as an error event.
    pub fn fail_transport(&mut self, description: impl Into<String>) -> Option<MessageInstruction> {
        if self.phase.is_terminal() {
            return None;
        }
        self.handle(StreamEvent::Error {
            message: description.into(),
        })
    }

    /// How the session ended, once it has.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.phase {
            SessionPhase::Completed => Some(SessionOutcome::Completed),
            SessionPhase::Failed => Some(SessionOutcome::Failed {
                message: self.error.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }

    /// Clear all state and take a fresh message id.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
