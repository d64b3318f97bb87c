//! Login, signup and logout flows.

use crate::session::SessionContext;
use moodflix_core::auth::{
    AuthService, Credentials, LOGIN_REJECTED_MESSAGE, SIGNUP_LOGIN_REJECTED_MESSAGE, SignupForm,
};
use moodflix_core::error::{MoodflixError, Result};
use moodflix_core::session::Session;
use std::sync::Arc;

/// Coordinates the authentication backend with the local session.
///
/// Errors are returned as-is for the caller to show; the session is only
/// touched on success.
pub struct AuthUseCase {
    service: Arc<dyn AuthService>,
    session: SessionContext,
}

impl AuthUseCase {
    pub fn new(service: Arc<dyn AuthService>, session: SessionContext) -> Self {
        Self { service, session }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let credentials = Credentials::new(email.trim(), password);
        Self::require_credentials(&credentials)?;

        let grant = self.service.login(&credentials).await?;
        Ok(self.session.login(grant.token, grant.user).await)
    }

    /// Registers, then logs in with the same credentials.
    pub async fn signup(&self, form: SignupForm) -> Result<Session> {
        let form = SignupForm {
            email: form.email.trim().to_string(),
            ..form
        };
        let credentials = form.credentials();
        Self::require_credentials(&credentials)?;

        self.service.signup(&form).await?;
        tracing::info!("[AuthUseCase] Signed up {}", form.email);

        let grant = self
            .service
            .login(&credentials)
            .await
            .map_err(|e| match e {
                MoodflixError::Authentication(message) if message == LOGIN_REJECTED_MESSAGE => {
                    MoodflixError::authentication(SIGNUP_LOGIN_REJECTED_MESSAGE)
                }
                other => other,
            })?;
        Ok(self.session.login(grant.token, grant.user).await)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn require_credentials(credentials: &Credentials) -> Result<()> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(MoodflixError::authentication(
                "Email and password are required",
            ));
        }
        Ok(())
    }
}
