//! Authentication-related error types.
//!
//! This module defines errors related to signing in, bearer tokens, and
//! credential storage.

use std::fmt;

use crate::traits::CredentialsError;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No access token available (user not logged in).
    NotAuthenticated,

    /// The backend rejected the token.
    TokenRejected { message: String },

    /// Sign-in failed (wrong email or password).
    InvalidCredentials { message: String },

    /// Credentials could not be loaded.
    CredentialsLoadFailed { message: String },

    /// Credentials could not be saved.
    CredentialsSaveFailed { message: String },

    /// Auth endpoint returned an unexpected error.
    ApiError { status: u16, message: String },
}

impl AuthError {
    /// Check if this error might be resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated
                | AuthError::TokenRejected { .. }
                | AuthError::CredentialsLoadFailed { .. }
                | AuthError::ApiError { status: 401, .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::TokenRejected { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthError::InvalidCredentials { message } => {
                format!("Sign in failed: {}", message)
            }
            AuthError::CredentialsLoadFailed { .. } => {
                "Could not load your credentials. Please sign in again.".to_string()
            }
            AuthError::CredentialsSaveFailed { .. } => {
                "Could not save your credentials. Please check file permissions.".to_string()
            }
            AuthError::ApiError { status, message } => match *status {
                401 => "Your session has expired. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                _ => format!("Authentication error: {}", message),
            },
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::TokenRejected { .. } => "E_AUTH_TOKEN",
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::CredentialsLoadFailed { .. } => "E_AUTH_CRED_LOAD",
            AuthError::CredentialsSaveFailed { .. } => "E_AUTH_CRED_SAVE",
            AuthError::ApiError { .. } => "E_AUTH_API",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::TokenRejected { message } => write!(f, "Token rejected: {}", message),
            AuthError::InvalidCredentials { message } => {
                write!(f, "Invalid credentials: {}", message)
            }
            AuthError::CredentialsLoadFailed { message } => {
                write!(f, "Failed to load credentials: {}", message)
            }
            AuthError::CredentialsSaveFailed { message } => {
                write!(f, "Failed to save credentials: {}", message)
            }
            AuthError::ApiError { status, message } => {
                write!(f, "Authentication API error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<CredentialsError> for AuthError {
    fn from(err: CredentialsError) -> Self {
        match err {
            CredentialsError::NotFound => AuthError::NotAuthenticated,
            CredentialsError::SaveFailed(message) | CredentialsError::ClearFailed(message) => {
                AuthError::CredentialsSaveFailed { message }
            }
            other => AuthError::CredentialsLoadFailed {
                message: other.to_string(),
            },
        }
    }
}
