//! AuthApiClient - REST client for the authentication backend.

use crate::endpoint;
use async_trait::async_trait;
use moodflix_core::auth::{
    AuthGrant, AuthService, Credentials, LOGIN_REJECTED_MESSAGE, SIGNUP_REJECTED_MESSAGE,
    SignupForm,
};
use moodflix_core::config::ServiceEndpoints;
use moodflix_core::error::{MoodflixError, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Client for `POST /login` and `POST /signup`.
#[derive(Clone)]
pub struct AuthApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

/// Error body of a rejected login/signup.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl AuthApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Self {
        Self::new(endpoints.auth_url.clone(), endpoints.request_timeout())
    }

    async fn post<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let url = endpoint(&self.base_url, path);
        self.client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("[AuthApi] Request to {} failed: {}", url, e);
                MoodflixError::network(format!("Error connecting to server: {}", e))
            })
    }

    /// Turns a non-success response into the user-facing message.
    async fn rejection(response: Response, fallback: &str) -> MoodflixError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        tracing::info!("[AuthApi] Rejected ({}): {}", status, message);
        MoodflixError::authentication(message)
    }
}

#[async_trait]
impl AuthService for AuthApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let response = self.post("login", credentials).await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response, LOGIN_REJECTED_MESSAGE).await);
        }
        Ok(response.json::<AuthGrant>().await?)
    }

    async fn signup(&self, form: &SignupForm) -> Result<()> {
        let response = self.post("signup", form).await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response, SIGNUP_REJECTED_MESSAGE).await);
        }
        Ok(())
    }
}
