//! Unified error type for the chat client.
//!
//! This module defines the main `ChatError` enum that unifies all error types
//! in the crate, providing consistent error handling, categorization,
//! and user messaging.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::traits::{CredentialsError, HttpError};

/// Unified error type for the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Network-related errors (connections, HTTP, timeouts).
    Network(NetworkError),

    /// Authentication errors.
    Auth(AuthError),

    /// Query stream errors.
    Stream(StreamError),

    /// Invalid configuration.
    Config { message: String },
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status, .. }) if *status >= 500 => {
                ErrorCategory::Server
            }
            ChatError::Network(NetworkError::HttpStatus { status, .. }) if *status >= 400 => {
                ErrorCategory::User
            }
            ChatError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Client,
            ChatError::Network(NetworkError::Cancelled) => ErrorCategory::Cancelled,
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Auth(err) => {
                if err.requires_reauth() {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::User
                }
            }
            ChatError::Stream(StreamError::Interrupted { .. }) => ErrorCategory::Network,
            ChatError::Stream(StreamError::BackendError { .. }) => ErrorCategory::Server,
            ChatError::Config { .. } => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Auth(_) => false,
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Config { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Auth(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Config { message } => format!("Configuration error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Auth(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Config { .. } => "E_CONFIG",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Check if this error requires signing in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            ChatError::Auth(err) => err.requires_reauth(),
            ChatError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Auth(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Config { message } => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Auth(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Config { .. } => None,
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<AuthError> for ChatError {
    fn from(err: AuthError) -> Self {
        ChatError::Auth(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status: 401, message } => {
                ChatError::Auth(AuthError::TokenRejected { message })
            }
            other => ChatError::Network(other.into()),
        }
    }
}

impl From<CredentialsError> for ChatError {
    fn from(err: CredentialsError) -> Self {
        ChatError::Auth(err.into())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
