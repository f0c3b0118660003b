//! Shared fixtures for the integration suite.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use clinic_config::ConsoleConfig;
use clinic_core::{FileSessionStore, SessionWriter};
use clinic_types::{AdminLabels, SessionToken};

/// A session file in a scratch directory, removed on drop.
pub struct SessionFixture {
    pub dir: TempDir,
    pub store: FileSessionStore,
}

impl SessionFixture {
    pub fn new() -> Self {
        Self::with_labels(AdminLabels::default())
    }

    pub fn with_labels(labels: AdminLabels) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"), labels);
        Self { dir, store }
    }

    pub fn sign_in(&self, token: &str, role: Option<&str>) {
        self.store
            .sign_in(SessionToken::new(token).expect("token"), role)
            .expect("sign in");
    }

    pub fn sign_out(&self) {
        self.store.sign_out().expect("sign out");
    }

    /// Overwrite the session file with arbitrary content.
    pub fn write_raw(&self, content: &str) {
        fs::write(self.store.path(), content).expect("write session file");
    }
}

/// Write `content` as a config file and load it back.
pub fn load_config(content: &str) -> (TempDir, ConsoleConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path: PathBuf = dir.path().join("config.toml");
    fs::write(&path, content).expect("write config");
    let config = ConsoleConfig::load_from(&path)
        .expect("load config")
        .expect("config present");
    (dir, config)
}

/// Role claims the backend issues for clinic staff.
pub const STAFF_CLAIMS: [&str; 3] = ["医生", "护士", "咨询师"];
pub const ADMIN_CLAIM: &str = "管理员";
