//! Errors that end a query stream after it opened.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Reading the body failed part way through.
    Interrupted { message: String },

    /// The backend sent an `error` event.
    BackendError { message: String },
}

impl StreamError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::Interrupted { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            StreamError::Interrupted { message } => {
                format!("The answer stopped part way through: {}", message)
            }
            StreamError::BackendError { message } => format!("Server error: {}", message),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Interrupted { .. } => "E_STREAM_CONN",
            StreamError::BackendError { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Interrupted { message } => write!(f, "Stream interrupted: {}", message),
            StreamError::BackendError { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
