//! Session identity types.
//!
//! The stored form of a session is two loose strings (`token`, `userRole`).
//! These types are what that pair decodes into: the role claim is resolved
//! to a [`Role`] exactly once, when the session is loaded, so nothing
//! downstream ever compares role strings.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Display label the console backend assigns to administrators.
pub const ADMINISTRATOR_LABEL: &str = "管理员";

/// English equivalent accepted by default alongside [`ADMINISTRATOR_LABEL`].
pub const ADMINISTRATOR_LABEL_EN: &str = "administrator";

/// Privilege level carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    /// Any non-administrative claim (doctor, nurse, consultant, ...).
    Staff,
}

impl Role {
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("administrator label list must contain at least one non-empty label")]
pub struct EmptyAdminLabelsError;

/// The exact role strings that decode to [`Role::Administrator`].
///
/// Matching is byte-for-byte: no trimming, no case folding, no locale rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct AdminLabels(Vec<String>);

impl AdminLabels {
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, EmptyAdminLabelsError> {
        let labels: Vec<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(EmptyAdminLabelsError);
        }
        Ok(Self(labels))
    }

    #[must_use]
    pub fn decode(&self, claim: &str) -> Role {
        if self.0.iter().any(|label| label == claim) {
            Role::Administrator
        } else {
            Role::Staff
        }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

impl Default for AdminLabels {
    fn default() -> Self {
        Self(vec![
            ADMINISTRATOR_LABEL.to_string(),
            ADMINISTRATOR_LABEL_EN.to_string(),
        ])
    }
}

impl TryFrom<Vec<String>> for AdminLabels {
    type Error = EmptyAdminLabelsError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session token must not be empty")]
pub struct EmptyTokenError;

/// Opaque session credential.
///
/// Never empty. `Debug` and `Display` redact the value so tokens cannot leak
/// into logs; use [`SessionToken::expose`] where the raw value is needed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyTokenError> {
        let value = value.into();
        if value.is_empty() {
            Err(EmptyTokenError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// The authentication context observed by one navigation attempt.
///
/// A role only exists inside `Authenticated`, so a role without a token is
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        token: SessionToken,
        role: Option<Role>,
    },
}

impl Session {
    #[must_use]
    pub fn authenticated(token: SessionToken, role: Option<Role>) -> Self {
        Self::Authenticated { token, role }
    }

    /// Decode the stored `(token, userRole)` pair.
    ///
    /// A missing or empty token yields `Anonymous`; the role claim is then
    /// ignored. An empty role claim counts as no role.
    #[must_use]
    pub fn from_stored(
        token: Option<&str>,
        role_claim: Option<&str>,
        labels: &AdminLabels,
    ) -> Self {
        let Some(token) = token.and_then(|t| SessionToken::new(t).ok()) else {
            return Self::Anonymous;
        };
        let role = role_claim
            .filter(|claim| !claim.is_empty())
            .map(|claim| labels.decode(claim));
        Self::Authenticated { token, role }
    }

    #[must_use]
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token, .. } => Some(token),
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { role, .. } => *role,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.role().is_some_and(Role::is_administrator)
    }
}
