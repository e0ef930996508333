//! Client configuration.
//!
//! Defaults suit a backend running locally; every field can be overridden
//! through the builder or the environment.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Backend base URL override
pub const ENV_API_URL: &str = "RAGCHAT_API_URL";
/// Request timeout in whole seconds
pub const ENV_TIMEOUT_SECS: &str = "RAGCHAT_TIMEOUT_SECS";
/// Credentials file location override
pub const ENV_CREDENTIALS: &str = "RAGCHAT_CREDENTIALS";

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the chat client.
///
/// # Example
///
/// ```ignore
/// use ragchat::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_url("https://chat.example.com/")
///     .with_request_timeout(Duration::from_secs(60));
/// assert_eq!(config.api_url, "https://chat.example.com");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_url: String,
    /// Deadline for non-streaming requests
    pub request_timeout: Duration,
    /// Deadline for establishing a connection (streaming included)
    pub connect_timeout: Duration,
    /// Where the access token is stored; `None` uses `~/.ragchat/credentials.json`
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend URL. Trailing slashes are stripped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout for non-streaming requests.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the credentials file.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Create config from environment variables.
    ///
    /// Reads `RAGCHAT_API_URL`, `RAGCHAT_TIMEOUT_SECS` and
    /// `RAGCHAT_CREDENTIALS`. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config = config.with_api_url(url);
            } else {
                warn!(value = %url, "Ignoring {}: not an http(s) URL", ENV_API_URL);
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config = config.with_request_timeout(Duration::from_secs(secs));
                }
                _ => warn!(
                    value = %raw,
                    "Ignoring {}: expected a positive integer", ENV_TIMEOUT_SECS
                ),
            }
        }

        if let Some(path) = lookup(ENV_CREDENTIALS) {
            if !path.trim().is_empty() {
                config = config.with_credentials_path(path.trim());
            }
        }

        config
    }

    /// Join a path onto the API URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let config = ClientConfig::new().with_api_url("https://api.example.com///");
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn test_builder_chaining() {
        let config = ClientConfig::new()
            .with_request_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(2))
            .with_credentials_path("/tmp/creds.json");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/creds.json")));
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://chat.example.com/"),
            (ENV_TIMEOUT_SECS, "45"),
            (ENV_CREDENTIALS, "/var/lib/ragchat/creds.json"),
        ]));
        assert_eq!(config.api_url, "https://chat.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(45));
        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("/var/lib/ragchat/creds.json"))
        );
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "localhost:8000"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert_eq!(config, ClientConfig::default());

        let config = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")]));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::new().with_api_url("http://host:1/");
        assert_eq!(config.endpoint("/chat/chats"), "http://host:1/chat/chats");
        assert_eq!(config.endpoint("auth/signin"), "http://host:1/auth/signin");
    }
}
