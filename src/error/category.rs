//! Coarse grouping of failures, used to pick a hint for the user.

use std::fmt;

/// Where a failure came from, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The backend could not be reached, the request timed out, or the
    /// answer stream broke off.
    Network,

    /// No usable token.
    Auth,

    /// The backend answered with a 5xx or sent an `error` event.
    Server,

    /// The backend's reply could not be decoded.
    Client,

    /// The backend rejected the request itself (4xx) or the sign-in.
    User,

    /// Bad local settings.
    Configuration,

    /// The caller stopped the request.
    Cancelled,
}

impl ErrorCategory {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Cancelled => "cancelled",
        }
    }

    /// What the user can do about it. Empty when there is nothing to suggest.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the backend is reachable and ask again.",
            ErrorCategory::Auth => "Sign in again with `ragchat login <email>`.",
            ErrorCategory::Server => "The backend could not answer. Try again in a moment.",
            ErrorCategory::Client => "The backend sent data this client does not understand.",
            ErrorCategory::User => "Check the request and try again.",
            ErrorCategory::Configuration => "Check the RAGCHAT_* environment variables.",
            ErrorCategory::Cancelled => "",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
