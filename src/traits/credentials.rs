//! Credentials provider trait abstraction.
//!
//! The chat backend authenticates with a bearer token obtained at sign-in.
//! Providers store and hand out that token; the stream driver asks for it
//! before opening a query.

use async_trait::async_trait;

use crate::auth::Credentials;

/// Credentials operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// No token stored
    NotFound,
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::NotFound => write!(f, "Credentials not found"),
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for credentials storage and retrieval.
///
/// # Example
///
/// ```ignore
/// use ragchat::traits::CredentialsProvider;
///
/// async fn bearer<P: CredentialsProvider>(provider: &P) -> Result<String, CredentialsError> {
///     let token = provider.access_token().await?;
///     Ok(format!("Bearer {}", token))
/// }
/// ```
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load credentials from storage.
    ///
    /// # Returns
    /// - `Ok(Some(credentials))` if credentials exist and were loaded successfully
    /// - `Ok(None)` if no credentials are stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Save credentials to storage.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Clear all stored credentials.
    async fn clear(&self) -> Result<(), CredentialsError>;

    /// The stored access token.
    ///
    /// Returns `CredentialsError::NotFound` when nothing usable is stored.
    async fn access_token(&self) -> Result<String, CredentialsError> {
        self.load()
            .await?
            .and_then(|creds| creds.access_token)
            .filter(|token| !token.is_empty())
            .ok_or(CredentialsError::NotFound)
    }
}
