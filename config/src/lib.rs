//! Configuration loading for the clinic console.
//!
//! The config file lives at `~/.clinic-console/config.toml`. Every section is
//! optional; a missing file means "all defaults". Raw TOML structs stay private
//! here and are resolved into validated domain types at the parse boundary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use clinic_types::{Access, AdminLabels, RouteDescriptor, RoutePath, RoutePathError};

const CONFIG_DIR: &str = ".clinic-console";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub session: Option<SessionConfig>,
    pub roles: Option<RolesConfig>,
    /// When present, replaces the built-in route table entirely.
    pub routes: Option<Vec<RouteEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Session file location. A leading `~/` expands to the home directory.
    pub file: Option<String>,
}

/// ```toml
/// [roles]
/// administrator = ["管理员", "administrator"]
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RolesConfig {
    pub administrator: AdminLabels,
}

#[derive(Debug, Error)]
pub enum RouteEntryError {
    #[error("invalid route path: {0}")]
    Path(#[from] RoutePathError),
    #[error("invalid redirect for route {path}: {source}")]
    Redirect {
        path: RoutePath,
        source: RoutePathError,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRouteEntry {
    path: String,
    name: Option<String>,
    title: Option<String>,
    icon: Option<String>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    admin: bool,
    redirect: Option<String>,
}

/// One `[[routes]]` entry, validated into a [`RouteDescriptor`].
///
/// The `public` and `admin` flags are folded into an [`Access`] here; an
/// entry with both set is kept as public and remembered as contradictory so
/// table construction can report it.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawRouteEntry")]
pub struct RouteEntry {
    descriptor: RouteDescriptor,
    contradictory: bool,
}

impl TryFrom<RawRouteEntry> for RouteEntry {
    type Error = RouteEntryError;

    fn try_from(raw: RawRouteEntry) -> Result<Self, Self::Error> {
        let path = RoutePath::parse(&raw.path)?;
        let access = Access::from_flags(raw.public, raw.admin);
        let mut descriptor = RouteDescriptor::new(path.clone()).with_access(access);
        if let Some(name) = raw.name {
            descriptor = descriptor.with_name(name);
        }
        if let Some(title) = raw.title {
            descriptor = descriptor.with_title(title);
        }
        if let Some(icon) = raw.icon {
            descriptor = descriptor.with_icon(icon);
        }
        if let Some(redirect) = raw.redirect {
            let target = RoutePath::parse(&redirect)
                .map_err(|source| RouteEntryError::Redirect { path, source })?;
            descriptor = descriptor.redirecting_to(target);
        }
        Ok(Self {
            descriptor,
            contradictory: raw.public && raw.admin,
        })
    }
}

impl RouteEntry {
    #[must_use]
    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    /// Whether the entry declared both `public` and `admin`.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        self.contradictory
    }
}

impl ConsoleConfig {
    /// Load from the default location. `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to read config: {err}");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to parse config: {err}");
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolved session file: the configured one, else `~/.clinic-console/session.json`.
    #[must_use]
    pub fn session_file(&self) -> Option<PathBuf> {
        self.session
            .as_ref()
            .and_then(|session| session.file.as_deref())
            .map(expand_home)
            .or_else(default_session_path)
    }

    #[must_use]
    pub fn admin_labels(&self) -> AdminLabels {
        self.roles
            .as_ref()
            .map(|roles| roles.administrator.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn routes(&self) -> Option<&[RouteEntry]> {
        self.routes.as_deref()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn default_session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(SESSION_FILE))
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(value)
}
