//! File-based credentials provider adapter.
//!
//! Wraps [`CredentialsManager`] so the token stored at sign-in can be handed
//! to the API client and the stream driver through [`CredentialsProvider`].

use async_trait::async_trait;
use std::path::Path;

use crate::auth::credentials::{Credentials, CredentialsManager};
use crate::config::ClientConfig;
use crate::traits::{CredentialsError, CredentialsProvider};

/// File-based credentials provider.
///
/// Credentials are stored in `~/.ragchat/credentials.json` unless the
/// configuration names another file.
///
/// # Example
///
/// ```ignore
/// use ragchat::adapters::FileCredentialsProvider;
/// use ragchat::traits::CredentialsProvider;
///
/// let provider = FileCredentialsProvider::new()?;
/// let token = provider.access_token().await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Create a provider for the default credentials file.
    ///
    /// Fails if the home directory cannot be determined.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(|manager| Self { manager })
            .ok_or_else(|| CredentialsError::Io("Failed to determine home directory".to_string()))
    }

    /// Create a provider for the file named in `config`, or the default one.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CredentialsError> {
        match &config.credentials_path {
            Some(path) => Ok(Self::with_path(path.clone())),
            None => Self::new(),
        }
    }

    /// Create a provider for a specific file.
    pub fn with_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            manager: CredentialsManager::with_path(path),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        // A missing file loads as empty credentials
        let creds = self.manager.load()?;
        if creds.is_empty() {
            Ok(None)
        } else {
            Ok(Some(creds))
        }
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.manager.save(creds)
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.manager.clear()
    }
}
