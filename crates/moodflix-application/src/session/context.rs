use moodflix_core::session::{Session, SessionStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Process-wide authentication state, passed explicitly to whoever needs it.
///
/// Cloning is cheap; every clone observes the same session. Readers use
/// [`is_authenticated`](Self::is_authenticated) or
/// [`subscribe`](Self::subscribe) to react to login/logout transitions.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<Option<Session>>>,
    logouts: Arc<AtomicU64>,
    store: Option<Arc<dyn SessionStore>>,
}

impl SessionContext {
    /// Signed-out context without persistence.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
            logouts: Arc::new(AtomicU64::new(0)),
            store: None,
        }
    }

    /// Signed-out context that writes login/logout through to `store`.
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    /// Rebuilds the context from whatever `store` holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    pub async fn restore(store: Arc<dyn SessionStore>) -> Self {
        let restored = match store.load().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("[SessionContext] Failed to restore session: {}", e);
                None
            }
        };
        if restored.is_some() {
            tracing::debug!("[SessionContext] Restored stored session");
        }

        let context = Self::with_store(store);
        context.state.send_replace(restored);
        context
    }

    /// Records a successful login.
    pub async fn login(&self, token: impl Into<String>, user: serde_json::Value) -> Session {
        let session = Session::new(token, user);
        self.state.send_replace(Some(session.clone()));
        tracing::info!("[SessionContext] Logged in");

        if let Some(store) = &self.store
            && let Err(e) = store.save(&session).await
        {
            tracing::warn!("[SessionContext] Failed to persist session: {}", e);
        }
        session
    }

    /// Clears the session.
    pub async fn logout(&self) {
        // Counted before publishing so a receiver that wakes up already sees it.
        self.logouts.fetch_add(1, Ordering::SeqCst);
        let previous = self.state.send_replace(None);
        if previous.is_some() {
            tracing::info!("[SessionContext] Logged out");
        }

        if let Some(store) = &self.store
            && let Err(e) = store.clear().await
        {
            tracing::warn!("[SessionContext] Failed to clear stored session: {}", e);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Number of logouts so far.
    ///
    /// `watch` keeps only the latest value, so a logout followed by a login
    /// can reach a receiver as a single signed-in update. Comparing this
    /// counter catches that.
    pub fn logout_count(&self) -> u64 {
        self.logouts.load(Ordering::SeqCst)
    }

    /// Receiver notified on every login/logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
