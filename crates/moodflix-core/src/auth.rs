//! Authentication collaborator boundary.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when a login is rejected without a backend message.
pub const LOGIN_REJECTED_MESSAGE: &str = "Invalid credentials";
/// Shown when a signup is rejected without a backend message.
pub const SIGNUP_REJECTED_MESSAGE: &str = "Signup failed";
/// Shown when the login right after a successful signup is rejected
/// without a backend message.
pub const SIGNUP_LOGIN_REJECTED_MESSAGE: &str = "Unable to complete login";

/// Email/password pair sent to `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form sent to `POST /signup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login payload: `{ token, user }`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    #[serde(default)]
    pub user: serde_json::Value,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Backend that verifies credentials and issues session tokens.
///
/// Rejections surface as `MoodflixError::Authentication` carrying the
/// backend's own message.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant>;

    /// Registers a new account. Does not log in.
    async fn signup(&self, form: &SignupForm) -> Result<()>;
}
