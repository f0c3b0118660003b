//! Authorization gateway.
//!
//! Decides, for every navigation attempt, whether the UI may proceed, must
//! send the user to log in, or must send them home for lack of privilege.
//!
//! # Check order
//!
//! Guards run in [`GUARD_ORDER`], first match wins:
//!
//! ```text
//! PublicRoute        target is public              -> Allow
//! Authenticated      no session token              -> RedirectTo(/login, Unauthenticated)
//! AdministratorRole  admin route, role not admin   -> RedirectTo(/dashboard, Forbidden)
//! (none matched)                                   -> Allow
//! ```
//!
//! The public check comes first so the login page stays reachable with a
//! missing or corrupt session.
//!
//! The gateway only produces [`Decision`] values. Showing the notice and
//! changing the navigation target are the caller's job (see
//! [`crate::Navigator`]).

use clinic_types::{Access, Decision, DenialReason, NavigationAttempt, RouteDescriptor, Session};

use crate::session_store::SessionProvider;

/// A single check in the gateway's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    PublicRoute,
    Authenticated,
    AdministratorRole,
}

/// Evaluation order of the guards. Reordering this changes behavior.
pub const GUARD_ORDER: [Guard; 3] = [
    Guard::PublicRoute,
    Guard::Authenticated,
    Guard::AdministratorRole,
];

impl Guard {
    /// `Some` ends evaluation with that decision; `None` passes to the next guard.
    #[must_use]
    pub fn check(self, target: &RouteDescriptor, session: &Session) -> Option<Decision> {
        match self {
            Self::PublicRoute => target.is_public().then_some(Decision::Allow),
            Self::Authenticated => (!session.is_authenticated())
                .then(|| Decision::deny(DenialReason::Unauthenticated)),
            Self::AdministratorRole => {
                let needs_admin = matches!(target.access(), Access::Administrator);
                (needs_admin && !session.is_administrator())
                    .then(|| Decision::deny(DenialReason::Forbidden))
            }
        }
    }
}

/// Pure decision for `target` under `session`.
#[must_use]
pub fn decide(target: &RouteDescriptor, session: &Session) -> Decision {
    GUARD_ORDER
        .iter()
        .find_map(|guard| guard.check(target, session))
        .unwrap_or(Decision::Allow)
}

/// Gateway bound to a session source.
///
/// Holds no mutable state of its own; the same attempt under the same session
/// always yields the same decision.
#[derive(Debug, Clone)]
pub struct Gateway<S> {
    sessions: S,
}

impl<S: SessionProvider> Gateway<S> {
    #[must_use]
    pub fn new(sessions: S) -> Self {
        Self { sessions }
    }

    /// Decide one attempt. Reads the session exactly once.
    #[must_use]
    pub fn evaluate(&self, attempt: &NavigationAttempt<'_>) -> Decision {
        let session = self.sessions.snapshot();
        let decision = decide(attempt.target, &session);
        tracing::debug!(
            target_path = %attempt.target.path(),
            from = attempt.from.map(|r| r.path().as_str()),
            authenticated = session.is_authenticated(),
            outcome = ?decision.outcome(),
            "Navigation evaluated"
        );
        decision
    }

    #[must_use]
    pub fn sessions(&self) -> &S {
        &self.sessions
    }
}
