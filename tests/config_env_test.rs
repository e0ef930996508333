//! Configuration read from the process environment.

use std::time::Duration;

use ragchat::config::{ClientConfig, ENV_API_URL, ENV_CREDENTIALS, ENV_TIMEOUT_SECS};
use serial_test::serial;

fn clear_env() {
    std::env::remove_var(ENV_API_URL);
    std::env::remove_var(ENV_TIMEOUT_SECS);
    std::env::remove_var(ENV_CREDENTIALS);
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    assert_eq!(ClientConfig::from_env(), ClientConfig::default());
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var(ENV_API_URL, "https://rag.example.com/");
    std::env::set_var(ENV_TIMEOUT_SECS, "12");
    std::env::set_var(ENV_CREDENTIALS, "/tmp/ragchat-creds.json");

    let config = ClientConfig::from_env();
    assert_eq!(config.api_url, "https://rag.example.com");
    assert_eq!(config.request_timeout, Duration::from_secs(12));
    assert_eq!(
        config.credentials_path.as_deref(),
        Some(std::path::Path::new("/tmp/ragchat-creds.json"))
    );
    assert_eq!(config.endpoint("retriever/query"), "https://rag.example.com/retriever/query");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_timeout_falls_back() {
    clear_env();
    std::env::set_var(ENV_TIMEOUT_SECS, "-5");
    assert_eq!(ClientConfig::from_env().request_timeout, Duration::from_secs(30));
    clear_env();
}
