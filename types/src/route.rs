//! Route paths and route descriptors.
//!
//! A [`RouteDescriptor`] is the static metadata the gateway consults for every
//! navigation attempt. Descriptors are immutable once built; the only way to
//! obtain one is through [`RouteDescriptor::new`] and its builder methods.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutePathError {
    #[error("route path must not be empty")]
    Empty,
    #[error("route path must be absolute (start with '/'): {0:?}")]
    Relative(String),
}

/// An absolute, normalized navigation path.
///
/// # Invariants
///
/// - Always starts with `/`
/// - No query string or fragment
/// - No repeated or trailing `/` (except the root itself)
///
/// # Serde
///
/// Serializes as a plain string. Deserialization normalizes and rejects
/// relative or empty input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    pub fn parse(raw: &str) -> Result<Self, RoutePathError> {
        let raw = raw.trim();
        let without_fragment = raw.split_once('#').map_or(raw, |(head, _)| head);
        let path = without_fragment
            .split_once('?')
            .map_or(without_fragment, |(head, _)| head);

        if path.is_empty() {
            return Err(RoutePathError::Empty);
        }
        if !path.starts_with('/') {
            return Err(RoutePathError::Relative(raw.to_string()));
        }

        let mut normalized = String::with_capacity(path.len());
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        Ok(Self(normalized))
    }

    /// Wrap a literal that is already in normalized form.
    pub(crate) fn from_normalized(value: &str) -> Self {
        debug_assert!(Self::parse(value).is_ok_and(|p| p.0 == value));
        Self(value.to_string())
    }

    /// The root route (`/`).
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl TryFrom<String> for RoutePath {
    type Error = RoutePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for RoutePath {
    type Error = RoutePathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoutePath> for String {
    fn from(value: RoutePath) -> Self {
        value.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who may open a route.
///
/// Replaces the `public` / `admin` flag pair of the route metadata surface.
/// A route cannot be both public and admin-only: [`Access::from_flags`]
/// gives `public` precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Reachable with or without a session.
    Public,
    /// Requires a session token.
    #[default]
    Authenticated,
    /// Requires a session token and the administrator role.
    Administrator,
}

impl Access {
    #[must_use]
    pub const fn from_flags(public: bool, admin: bool) -> Self {
        match (public, admin) {
            (true, _) => Self::Public,
            (false, true) => Self::Administrator,
            (false, false) => Self::Authenticated,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
            Self::Administrator => "administrator",
        }
    }
}

/// Static metadata for one navigable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    path: RoutePath,
    name: Option<String>,
    title: Option<String>,
    icon: Option<String>,
    access: Access,
    redirect: Option<RoutePath>,
}

impl RouteDescriptor {
    /// A route that requires a session and has no display metadata.
    #[must_use]
    pub fn new(path: RoutePath) -> Self {
        Self {
            path,
            name: None,
            title: None,
            icon: None,
            access: Access::default(),
            redirect: None,
        }
    }

    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Navigating here continues at `target` before any guard runs.
    #[must_use]
    pub fn redirecting_to(mut self, target: RoutePath) -> Self {
        self.redirect = Some(target);
        self
    }

    #[must_use]
    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&RoutePath> {
        self.redirect.as_ref()
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self.access, Access::Public)
    }

    #[must_use]
    pub fn requires_admin(&self) -> bool {
        matches!(self.access, Access::Administrator)
    }
}
