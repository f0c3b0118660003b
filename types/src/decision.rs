//! Navigation attempts and the gateway's decisions.

use std::fmt;

use crate::notice::{Notice, NoticeLevel};
use crate::route::{RouteDescriptor, RoutePath};

/// Where an unauthenticated visitor is sent.
pub const LOGIN_PATH: &str = "/login";

/// Where a signed-in visitor without enough privilege is sent.
pub const HOME_PATH: &str = "/dashboard";

/// One request to move the UI to `target`. Created per navigation event and
/// never stored.
#[derive(Debug, Clone, Copy)]
pub struct NavigationAttempt<'a> {
    pub target: &'a RouteDescriptor,
    pub from: Option<&'a RouteDescriptor>,
}

impl<'a> NavigationAttempt<'a> {
    #[must_use]
    pub fn new(target: &'a RouteDescriptor, from: Option<&'a RouteDescriptor>) -> Self {
        Self { target, from }
    }

    /// An attempt with no previous route (initial load).
    #[must_use]
    pub fn initial(target: &'a RouteDescriptor) -> Self {
        Self { target, from: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// No session token.
    Unauthenticated,
    /// Session token present, role insufficient.
    Forbidden,
}

impl DenialReason {
    /// The route a denial of this kind redirects to.
    #[must_use]
    pub fn redirect_target(self) -> RoutePath {
        let raw = match self {
            Self::Unauthenticated => LOGIN_PATH,
            Self::Forbidden => HOME_PATH,
        };
        RoutePath::from_normalized(raw)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    DeniedUnauthenticated,
    DeniedForbidden,
}

/// The gateway's answer for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the requested target unchanged.
    Allow,
    /// Abandon the target and navigate to `path` instead.
    RedirectTo { path: RoutePath, reason: DenialReason },
}

impl Decision {
    #[must_use]
    pub fn deny(reason: DenialReason) -> Self {
        Self::RedirectTo {
            path: reason.redirect_target(),
            reason,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Allow => Outcome::Allowed,
            Self::RedirectTo {
                reason: DenialReason::Unauthenticated,
                ..
            } => Outcome::DeniedUnauthenticated,
            Self::RedirectTo {
                reason: DenialReason::Forbidden,
                ..
            } => Outcome::DeniedForbidden,
        }
    }

    #[must_use]
    pub fn redirect_path(&self) -> Option<&RoutePath> {
        match self {
            Self::Allow => None,
            Self::RedirectTo { path, .. } => Some(path),
        }
    }

    /// The user-visible notice that accompanies this decision, if any.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Allow => None,
            Self::RedirectTo {
                reason: DenialReason::Unauthenticated,
                ..
            } => Some(Notice::new(NoticeLevel::Warning, "Please log in first")),
            Self::RedirectTo {
                reason: DenialReason::Forbidden,
                ..
            } => Some(Notice::new(
                NoticeLevel::Error,
                "Administrator privilege required",
            )),
        }
    }
}
