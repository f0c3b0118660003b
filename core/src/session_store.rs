//! Session storage.
//!
//! The gateway reads sessions through [`SessionProvider`] and nothing else, so
//! tests can hand it a fixture and the binary can hand it the durable file
//! store. Login and logout go through [`SessionWriter`], which the gateway
//! never sees.
//!
//! # Persistence format
//!
//! The file store keeps the browser-era key names so existing exports stay
//! readable:
//!
//! ```json
//! { "token": "eyJ...", "userRole": "管理员", "updatedAt": "2026-10-19T08:00:00+00:00" }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinic_types::{AdminLabels, Role, Session, SessionToken};

use crate::persist;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read access to the current session.
pub trait SessionProvider {
    /// Read token and role together, in one step.
    ///
    /// Callers that need both values must use a single snapshot; two
    /// separate reads can straddle a concurrent login or logout.
    fn snapshot(&self) -> Session;

    fn get_token(&self) -> Option<SessionToken> {
        self.snapshot().token().cloned()
    }

    fn get_role(&self) -> Option<Role> {
        self.snapshot().role()
    }
}

impl<P: SessionProvider + ?Sized> SessionProvider for &P {
    fn snapshot(&self) -> Session {
        (**self).snapshot()
    }
}

impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    fn snapshot(&self) -> Session {
        (**self).snapshot()
    }
}

/// Login/logout surface.
pub trait SessionWriter {
    /// Store a fresh credential and its role claim (display form, e.g. `管理员`).
    fn sign_in(
        &self,
        token: SessionToken,
        role_label: Option<&str>,
    ) -> Result<(), SessionStoreError>;

    /// Forget the credential and role claim.
    fn sign_out(&self) -> Result<(), SessionStoreError>;
}

impl<W: SessionWriter + ?Sized> SessionWriter for Arc<W> {
    fn sign_in(
        &self,
        token: SessionToken,
        role_label: Option<&str>,
    ) -> Result<(), SessionStoreError> {
        (**self).sign_in(token, role_label)
    }

    fn sign_out(&self) -> Result<(), SessionStoreError> {
        (**self).sign_out()
    }
}

/// In-process session store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    labels: AdminLabels,
    session: RwLock<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(labels: AdminLabels) -> Self {
        Self {
            labels,
            session: RwLock::new(Session::Anonymous),
        }
    }

    /// A store pre-loaded with `session`, decoded with the default labels.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            labels: AdminLabels::default(),
            session: RwLock::new(session),
        }
    }
}

impl SessionProvider for MemorySessionStore {
    fn snapshot(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionWriter for MemorySessionStore {
    fn sign_in(
        &self,
        token: SessionToken,
        role_label: Option<&str>,
    ) -> Result<(), SessionStoreError> {
        let role = role_label
            .filter(|label| !label.is_empty())
            .map(|label| self.labels.decode(label));
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Session::authenticated(token, role);
        Ok(())
    }

    fn sign_out(&self) -> Result<(), SessionStoreError> {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Session::Anonymous;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "userRole")]
    user_role: Option<String>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

/// Durable session store backed by a single JSON file.
///
/// Reads never fail: a missing file is an anonymous session, and an
/// unreadable or corrupt file is logged and also treated as anonymous, so a
/// broken store can only ever lock the user out of protected routes.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    labels: AdminLabels,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, labels: AdminLabels) -> Self {
        Self {
            path: path.into(),
            labels,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the stored session was last written, if recorded.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let stored = self.read_stored()?;
        let raw = stored.updated_at?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// The raw role claim as stored, before decoding.
    #[must_use]
    pub fn role_label(&self) -> Option<String> {
        self.read_stored()?.user_role
    }

    fn read_stored(&self) -> Option<StoredSession> {
        persist::recover_backup(&self.path);
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read session file: {e}");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring corrupt session file: {e}");
                None
            }
        }
    }

    fn io_error(&self, source: io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionProvider for FileSessionStore {
    fn snapshot(&self) -> Session {
        let stored = self.read_stored().unwrap_or_default();
        Session::from_stored(
            stored.token.as_deref(),
            stored.user_role.as_deref(),
            &self.labels,
        )
    }
}

impl SessionWriter for FileSessionStore {
    fn sign_in(
        &self,
        token: SessionToken,
        role_label: Option<&str>,
    ) -> Result<(), SessionStoreError> {
        let stored = StoredSession {
            token: Some(token.expose().to_string()),
            user_role: role_label.map(ToString::to_string),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        let bytes = serde_json::to_vec_pretty(&stored)?;
        persist::write_private(&self.path, &bytes).map_err(|e| self.io_error(e))?;
        tracing::info!(path = %self.path.display(), "Signed in");
        Ok(())
    }

    fn sign_out(&self) -> Result<(), SessionStoreError> {
        persist::remove_if_exists(&self.path).map_err(|e| self.io_error(e))?;
        persist::remove_if_exists(&self.path.with_extension("bak"))
            .map_err(|e| self.io_error(e))?;
        tracing::info!(path = %self.path.display(), "Signed out");
        Ok(())
    }
}
