use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The signed-in state cached on the client after a successful login.
///
/// `token` and `user` are opaque: they are stored and handed back, never
/// inspected.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: serde_json::Value,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: serde_json::Value) -> Self {
        Self {
            token: token.into(),
            user,
            signed_in_at: Utc::now(),
        }
    }

    /// Best-effort display name from the opaque user record.
    pub fn display_name(&self) -> Option<String> {
        let user = self.user.as_object()?;
        let first = user.get("firstname").and_then(|v| v.as_str());
        let last = user.get("lastname").and_then(|v| v.as_str());
        match (first, last) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.to_string()),
            _ => user
                .get("email")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}
