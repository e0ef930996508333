//! Command handlers.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::{Report, Result};
use tokio::sync::mpsc;

use crate::adapters::{FileCredentialsProvider, ReqwestHttpClient};
use crate::api::ChatApiClient;
use crate::auth::AuthApi;
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::models::{filter_by_title, group_by_time_label, Message, QueryRequest, Sender};
use crate::stream::{StreamDriver, StreamUpdate};
use crate::traits::{ConversationStore, CredentialsProvider, HttpClient};

/// Shared clients built from the configuration
struct Context {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    credentials: Arc<FileCredentialsProvider>,
}

impl Context {
    fn new(config: ClientConfig) -> Result<Self> {
        let http = ReqwestHttpClient::from_config(&config)?;
        let credentials = FileCredentialsProvider::from_config(&config)
            .wrap_err("Could not locate the credentials file")?;
        Ok(Self {
            config,
            http: Arc::new(http),
            credentials: Arc::new(credentials),
        })
    }

    fn api(&self) -> ChatApiClient {
        ChatApiClient::from_config(&self.config, self.http.clone(), self.credentials.clone())
    }
}

/// Stream an answer, printing text to stdout as it arrives.
pub async fn ask(config: ClientConfig, conversation_id: &str, query: &str) -> Result<()> {
    let ctx = Context::new(config)?;
    let driver = StreamDriver::new(Arc::new(ctx.api()));
    let request = QueryRequest::new(query, conversation_id);
    let messages = vec![Message::user(request.query.clone())];

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_updates(rx));

    let result = driver.run(messages, &request, Some(tx)).await;
    // The driver dropped its sender, so the printer drains and stops
    let _ = printer.await;

    let outcome = result.map_err(report)?;
    println!();
    match outcome.failure {
        None => Ok(()),
        Some(err) => Err(report(err)),
    }
}

/// An error report with the recovery hint on its own line.
fn report(err: ChatError) -> Report {
    match err.recovery_hint() {
        "" => eyre!("{}", err.user_message()),
        hint => eyre!("{}\n{}", err.user_message(), hint),
    }
}

async fn print_updates(mut rx: mpsc::UnboundedReceiver<StreamUpdate>) {
    let mut printed = 0;
    let mut last_status: Option<String> = None;
    let mut stdout = std::io::stdout();

    while let Some(update) = rx.recv().await {
        if update.status.is_some() && update.status != last_status {
            if let Some(status) = &update.status {
                eprintln!("[{}]", status);
            }
        }
        last_status = update.status;

        let answer = update
            .messages
            .iter()
            .find(|m| m.sender == Sender::Ai && !m.is_error);
        if let Some(answer) = answer {
            // Accumulated text only grows, so the printed prefix stays valid
            if answer.text.len() > printed && answer.text.is_char_boundary(printed) {
                let _ = write!(stdout, "{}", &answer.text[printed..]);
                let _ = stdout.flush();
                printed = answer.text.len();
            }
        }
    }
}

/// Print conversations grouped by age.
pub async fn chats(config: ClientConfig, search: Option<&str>) -> Result<()> {
    let ctx = Context::new(config)?;
    let conversations = ctx.api().list().await.map_err(report)?;

    let matching = filter_by_title(&conversations, search.unwrap_or(""));
    if matching.is_empty() {
        println!("No conversations.");
        return Ok(());
    }
    for (label, members) in group_by_time_label(matching, Utc::now()) {
        println!("{}", label);
        for conversation in members {
            println!("  {:<12} {}", conversation.id, conversation.title);
        }
    }
    Ok(())
}

/// Sign in with `email` and a password read from the terminal.
pub async fn login(config: ClientConfig, email: &str) -> Result<()> {
    let ctx = Context::new(config)?;
    let password = rpassword::prompt_password("Password: ").wrap_err("Failed to read password")?;

    let auth = AuthApi::new(ctx.http.clone(), ctx.config.api_url.clone());
    let credentials = auth.sign_in(email, &password).await.map_err(report)?;
    ctx.credentials
        .save(&credentials)
        .await
        .wrap_err("Failed to store credentials")?;

    println!("Signed in as {}.", email);
    Ok(())
}

/// Forget the stored token.
pub async fn logout(config: ClientConfig) -> Result<()> {
    let ctx = Context::new(config)?;
    ctx.credentials
        .clear()
        .await
        .wrap_err("Failed to remove credentials")?;
    println!("Signed out.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, NetworkError, StreamError};

    #[test]
    fn test_report_adds_hint() {
        let text = report(ChatError::Auth(AuthError::NotAuthenticated)).to_string();
        assert!(text.contains("not signed in"));
        assert!(text.ends_with("Sign in again with `ragchat login <email>`."));

        let text = report(ChatError::Stream(StreamError::BackendError {
            message: "index offline".to_string(),
        }))
        .to_string();
        assert!(text.contains("index offline"));
        assert!(text.contains("Try again"));
    }

    #[test]
    fn test_report_cancelled_has_no_hint() {
        let text = report(ChatError::Network(NetworkError::Cancelled)).to_string();
        assert_eq!(text, "The request was cancelled.");
    }
}
