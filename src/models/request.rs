use serde::{Deserialize, Serialize};

/// Request body of the streaming query endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    /// Trimmed, non-empty question
    pub query: String,
    pub conversation_id: String,
}

impl QueryRequest {
    /// Create a query request. The query is trimmed.
    pub fn new(query: &str, conversation_id: impl Into<String>) -> Self {
        Self {
            query: query.trim().to_string(),
            conversation_id: conversation_id.into(),
        }
    }
}

/// Body for endpoints that authenticate through the payload
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenBody<'a> {
    pub access_token: &'a str,
}

/// Body for create and rename
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TitleBody<'a> {
    pub access_token: &'a str,
    pub title: &'a str,
}

/// Body for the system prompt update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemPrompt {
    #[serde(default)]
    pub system_prompt: String,
}

/// Generic `{message}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
