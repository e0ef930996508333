//! Chat backend API client.
//!
//! REST endpoints for conversations and the system prompt, plus the
//! streaming query endpoint consumed by [`StreamDriver`](crate::stream::StreamDriver).
//!
//! Conversation endpoints authenticate with the access token in the JSON
//! body; query, delete and prompt endpoints use a bearer header.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{http_error_description, ChatResult};
use crate::models::{
    into_client_messages, sort_by_recent, Ack, Conversation, ConversationList,
    CreatedConversation, Message, MessagesResponse, QueryRequest, SystemPrompt, TitleBody,
    TokenBody,
};
use crate::traits::{
    ByteStream, ConversationStore, CredentialsError, CredentialsProvider, Headers, HttpClient,
    HttpError, Response,
};

/// Client for the chat backend.
pub struct ChatApiClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    credentials: Arc<dyn CredentialsProvider>,
}

impl ChatApiClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Create a client for the backend named in `config`.
    pub fn from_config(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self::new(http, config.api_url.clone(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The stored access token.
    pub async fn access_token(&self) -> Result<String, CredentialsError> {
        self.credentials.access_token().await
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    fn bearer_headers(token: &str) -> Headers {
        let mut headers = Self::json_headers();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers
    }

    /// Turn a non-2xx response into an error carrying the backend's description.
    fn check_status(response: Response) -> Result<Response, HttpError> {
        if response.is_success() {
            return Ok(response);
        }
        let message =
            http_error_description(response.status, response.backend_message().as_deref());
        Err(HttpError::ServerError {
            status: response.status,
            message,
        })
    }

    fn parse<T: DeserializeOwned>(response: Response) -> ChatResult<T> {
        let response = Self::check_status(response)?;
        Ok(response.json()?)
    }

    /// Open the streaming query endpoint.
    ///
    /// Fails before any chunk is yielded if the backend answers with an
    /// error status.
    pub async fn open_query_stream(
        &self,
        token: &str,
        request: &QueryRequest,
    ) -> Result<ByteStream, HttpError> {
        let url = self.url("/retriever/query");
        let body = serde_json::to_string(request).map_err(|e| HttpError::Other(e.to_string()))?;
        debug!(conversation_id = %request.conversation_id, "Opening query stream");
        self.http
            .post_stream(&url, &body, &Self::bearer_headers(token))
            .await
    }

    /// The user's system prompt.
    pub async fn get_system_prompt(&self) -> ChatResult<String> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(&self.url("/prompt/get_user_system_prompt"), &Self::bearer_headers(&token))
            .await?;
        let prompt: SystemPrompt = Self::parse(response)?;
        Ok(prompt.system_prompt)
    }

    /// Replace the user's system prompt.
    pub async fn update_system_prompt(&self, system_prompt: &str) -> ChatResult<()> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&SystemPrompt {
            system_prompt: system_prompt.to_string(),
        })?;
        let response = self
            .http
            .post(
                &self.url("/prompt/update_user_system_prompt"),
                &body,
                &Self::bearer_headers(&token),
            )
            .await?;
        let ack: Ack = Self::parse(response)?;
        info!(message = ?ack.message, "System prompt updated");
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for ChatApiClient {
    async fn list(&self) -> ChatResult<Vec<Conversation>> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&TokenBody {
            access_token: &token,
        })?;
        let response = self
            .http
            .post(&self.url("/chat/chats"), &body, &Self::json_headers())
            .await?;
        let mut list: ConversationList = Self::parse(response)?;
        sort_by_recent(&mut list.conversations);
        debug!(count = list.conversations.len(), "Fetched conversations");
        Ok(list.conversations)
    }

    async fn create(&self, title: &str) -> ChatResult<String> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&TitleBody {
            access_token: &token,
            title,
        })?;
        let response = self
            .http
            .post(&self.url("/chat/new_chat"), &body, &Self::json_headers())
            .await?;
        let created: CreatedConversation = Self::parse(response)?;
        info!(id = %created.conversation_id, "Conversation created");
        Ok(created.conversation_id)
    }

    async fn rename(&self, id: &str, title: &str) -> ChatResult<()> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&TitleBody {
            access_token: &token,
            title,
        })?;
        let url = self.url(&format!("/chat/update_chat_title/{}", urlencoding::encode(id)));
        let response = self.http.put(&url, &body, &Self::json_headers()).await?;
        let _: Ack = Self::parse(response)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> ChatResult<()> {
        let token = self.access_token().await?;
        let url = self.url(&format!("/chat/delete_chat/{}", urlencoding::encode(id)));
        let response = self.http.delete(&url, &Self::bearer_headers(&token)).await?;
        Self::check_status(response)?;
        info!(id = %id, "Conversation deleted");
        Ok(())
    }

    async fn fetch_messages(&self, id: &str) -> ChatResult<Vec<Message>> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&TokenBody {
            access_token: &token,
        })?;
        let url = self.url(&format!("/chat/chat/{}/messages", urlencoding::encode(id)));
        let response = self.http.post(&url, &body, &Self::json_headers()).await?;
        let parsed: MessagesResponse = Self::parse(response)?;
        Ok(into_client_messages(parsed.messages))
    }
}
