//! Credentials storage and management.
//!
//! The access token returned at sign-in is stored as JSON, by default in
//! `~/.ragchat/credentials.json`.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::traits::CredentialsError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".ragchat";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Authentication credentials for the chat backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token for API authentication.
    pub access_token: Option<String>,
    /// The authenticated user's ID.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Email used to sign in.
    #[serde(default)]
    pub email: Option<String>,
}

impl Credentials {
    /// Create new empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the credentials have a non-empty access token.
    pub fn has_token(&self) -> bool {
        self.access_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// Check if nothing at all is stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.user_id.is_none() && self.email.is_none()
    }
}

/// Manages credential storage and retrieval.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a CredentialsManager for the default location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Create a CredentialsManager for a specific file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// A missing file yields default (empty) credentials.
    pub fn load(&self) -> Result<Credentials, CredentialsError> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => return Err(CredentialsError::Io(e.to_string())),
        };

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| CredentialsError::Serialization(e.to_string()))
    }

    /// Save credentials to the credentials file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the credentials file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialsError::ClearFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[test]
    fn test_credentials_default() {
        let creds = Credentials::default();
        assert!(creds.access_token.is_none());
        assert!(!creds.has_token());
        assert!(creds.is_empty());
    }

    #[test]
    fn test_credentials_has_token() {
        let mut creds = Credentials::new();
        creds.access_token = Some(String::new());
        assert!(!creds.has_token());
        creds.access_token = Some("tok".to_string());
        assert!(creds.has_token());
    }

    #[test]
    fn test_credentials_manager_default_path() {
        if let Some(manager) = CredentialsManager::new() {
            assert!(manager.credentials_path().ends_with(".ragchat/credentials.json"));
        }
    }

    #[test]
    fn test_load_nonexistent_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert!(manager.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let creds = Credentials {
            access_token: Some("token-abc".to_string()),
            user_id: Some("7".to_string()),
            email: Some("ana@example.com".to_string()),
        };
        manager.save(&creds).unwrap();
        assert!(manager.credentials_path().exists());
        assert_eq!(manager.load().unwrap(), creds);
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        manager
            .save(&Credentials {
                access_token: Some("t".to_string()),
                ..Default::default()
            })
            .unwrap();

        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        // Clearing twice is fine
        manager.clear().unwrap();
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not json").unwrap();

        assert!(matches!(
            manager.load(),
            Err(CredentialsError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_tolerates_missing_optional_fields() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), r#"{"access_token": "abc"}"#).unwrap();

        let creds = manager.load().unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("abc"));
        assert!(creds.user_id.is_none());
    }
}
