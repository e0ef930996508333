//! Sign-in and sign-up against the chat backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::credentials::Credentials;
use crate::error::{http_error_description, AuthError, ChatResult};
use crate::models::deserialize_optional_id;
use crate::traits::{Headers, HttpClient, Response};

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    access_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    user_id: Option<String>,
}

/// Client for the `/auth` endpoints.
pub struct AuthApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl AuthApi {
    /// Create a client for the backend at `base_url`.
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> ChatResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let body = serde_json::to_string(&CredentialsBody { email, password })?;
        debug!(url = %url, "Posting credentials");
        let response = self.http.post(&url, &body, &Self::json_headers()).await?;

        if response.is_success() {
            return Ok(response);
        }

        let message =
            http_error_description(response.status, response.backend_message().as_deref());
        Err(match response.status {
            400 | 401 | 403 | 404 => AuthError::InvalidCredentials { message },
            status => AuthError::ApiError { status, message },
        }
        .into())
    }

    /// Exchange email and password for an access token.
    ///
    /// The returned credentials are not persisted; callers store them
    /// through a [`CredentialsProvider`](crate::traits::CredentialsProvider).
    pub async fn sign_in(&self, email: &str, password: &str) -> ChatResult<Credentials> {
        let response = self.post_credentials("/auth/signin", email, password).await?;
        let parsed: SignInResponse = response.json()?;

        let token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::ApiError {
                status: response.status,
                message: "Sign-in response did not contain an access token".to_string(),
            })?;

        info!(user_id = ?parsed.user_id, "Signed in");
        Ok(Credentials {
            access_token: Some(token),
            user_id: parsed.user_id,
            email: Some(email.to_string()),
        })
    }

    /// Register a new account. Returns the new user's id if the backend sends one.
    pub async fn sign_up(&self, email: &str, password: &str) -> ChatResult<Option<String>> {
        let response = self.post_credentials("/auth/signup", email, password).await?;
        let parsed: SignUpResponse = response.json()?;
        info!(user_id = ?parsed.user_id, "Account created");
        Ok(parsed.user_id)
    }
}
