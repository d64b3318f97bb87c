//! Session persistence port.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// Where a signed-in session survives between runs.
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the stored session, `None` if nobody is signed in.
    async fn load(&self) -> Result<Option<Session>>;

    /// Replaces the stored session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes the stored session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}
