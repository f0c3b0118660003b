//! Applies gateway decisions to navigation.
//!
//! ```text
//! navigate(raw)
//!   -> RouteTable::resolve          (unknown paths land on the wildcard)
//!   -> follow route redirects       (`/` -> `/dashboard`, wildcard -> `/`)
//!   -> Gateway::evaluate
//!        Allow                      commit, done
//!        RedirectTo(path, reason)   push one notice, restart at `path`
//! ```
//!
//! A redirect restarts the whole pipeline, so the target of a denial is
//! itself gated. Chains longer than [`MAX_REDIRECTS`] abort without moving.

use thiserror::Error;

use clinic_types::{Decision, DenialReason, NavigationAttempt, RouteDescriptor, RoutePath};

use crate::gateway::Gateway;
use crate::notices::{NoticeQueue, NoticeSink};
use crate::route_table::RouteTable;
use crate::session_store::SessionProvider;

pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("navigation to {requested} exceeded {MAX_REDIRECTS} redirects (last: {last})")]
    RedirectLoop { requested: String, last: RoutePath },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopCause {
    /// The route itself forwards elsewhere.
    RouteRedirect,
    /// The gateway turned the attempt away.
    Denied(DenialReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub from: RoutePath,
    pub to: RoutePath,
    pub cause: HopCause,
}

/// A completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The path as the caller passed it.
    pub requested: String,
    /// Where the user ended up.
    pub resolved: RoutePath,
    pub hops: Vec<Hop>,
}

impl Navigation {
    /// Whether the user landed where they asked to go.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        !self
            .hops
            .iter()
            .any(|hop| matches!(hop.cause, HopCause::Denied(_)))
    }

    /// The first denial along the way, if any.
    #[must_use]
    pub fn denial(&self) -> Option<DenialReason> {
        self.hops.iter().find_map(|hop| match hop.cause {
            HopCause::Denied(reason) => Some(reason),
            HopCause::RouteRedirect => None,
        })
    }
}

/// Router state: the table, the gateway, where the user is, and what they
/// have been told.
#[derive(Debug)]
pub struct Navigator<S, N = NoticeQueue> {
    table: RouteTable,
    gateway: Gateway<S>,
    notices: N,
    current: Option<RoutePath>,
}

impl<S: SessionProvider> Navigator<S, NoticeQueue> {
    #[must_use]
    pub fn new(table: RouteTable, gateway: Gateway<S>) -> Self {
        Self::with_sink(table, gateway, NoticeQueue::new())
    }
}

impl<S: SessionProvider, N: NoticeSink> Navigator<S, N> {
    #[must_use]
    pub fn with_sink(table: RouteTable, gateway: Gateway<S>, notices: N) -> Self {
        Self {
            table,
            gateway,
            notices,
            current: None,
        }
    }

    pub fn navigate(&mut self, raw: &str) -> Result<Navigation, NavigationError> {
        let from = self.current.as_ref().and_then(|path| self.table.get(path));
        let mut route: &RouteDescriptor = self.table.resolve(raw);
        let mut hops: Vec<Hop> = Vec::new();
        let mut pending_notices = Vec::new();

        loop {
            if hops.len() > MAX_REDIRECTS {
                tracing::warn!(requested = raw, last = %route.path(), "Redirect loop");
                return Err(NavigationError::RedirectLoop {
                    requested: raw.to_string(),
                    last: route.path().clone(),
                });
            }

            if let Some(target) = route.redirect() {
                hops.push(Hop {
                    from: route.path().clone(),
                    to: target.clone(),
                    cause: HopCause::RouteRedirect,
                });
                route = self.table.resolve(target.as_str());
                continue;
            }

            let decision = self.gateway.evaluate(&NavigationAttempt::new(route, from));
            let Decision::RedirectTo {
                path: target,
                reason,
            } = &decision
            else {
                break;
            };
            hops.push(Hop {
                from: route.path().clone(),
                to: target.clone(),
                cause: HopCause::Denied(*reason),
            });
            pending_notices.extend(decision.notice());
            route = self.table.resolve(target.as_str());
        }

        let resolved = route.path().clone();
        for notice in pending_notices {
            self.notices.push(notice);
        }
        tracing::debug!(requested = raw, resolved = %resolved, hops = hops.len(), "Navigated");
        self.current = Some(resolved.clone());
        Ok(Navigation {
            requested: raw.to_string(),
            resolved,
            hops,
        })
    }

    /// The route the user is on, if any navigation has succeeded.
    #[must_use]
    pub fn current(&self) -> Option<&RouteDescriptor> {
        self.current.as_ref().and_then(|path| self.table.get(path))
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    #[must_use]
    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut N {
        &mut self.notices
    }
}
