//! Session Gate: decides whether the capture view may run at all.

use crate::session::SessionContext;
use moodflix_core::session::Session;
use tokio::sync::watch;

/// Where an unauthenticated visitor is sent.
pub const SIGN_IN_ROUTE: &str = "/login";

/// Shown in place of the capture UI while signed out.
pub const SIGN_IN_NOTICE: &str = "You must be signed in to use emotion detection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Camera and detection may start.
    Admit,
    /// Leave the capture view; nothing is started.
    Redirect {
        to: &'static str,
        notice: &'static str,
    },
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Reads the session and turns it into a routing decision.
///
/// A signed-out session is not an error, just a redirect.
#[derive(Clone)]
pub struct SessionGate {
    session: SessionContext,
}

impl SessionGate {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    pub fn evaluate(&self) -> GateDecision {
        decide(self.session.is_authenticated())
    }

    pub fn logout_count(&self) -> u64 {
        self.session.logout_count()
    }

    /// Receiver to watch for authentication changes after admission.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

/// Maps an authentication flag onto a gate decision.
pub fn decide(is_authenticated: bool) -> GateDecision {
    if is_authenticated {
        GateDecision::Admit
    } else {
        GateDecision::Redirect {
            to: SIGN_IN_ROUTE,
            notice: SIGN_IN_NOTICE,
        }
    }
}
