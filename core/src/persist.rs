//! Crash-safe persistence for the session file.
//!
//! Writes go to a temp file in the destination directory and are renamed into
//! place, so a reader never observes a half-written session. The file holds a
//! credential, so it is created owner-only on Unix.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Replace `path` with `bytes` atomically, creating parent directories.
pub fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(OWNER_ONLY))?;
    }

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        // Windows refuses to rename over an existing file.
        if !path.exists() {
            return Err(err.error);
        }
        let backup = backup_path(path);
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove session backup: {e}");
        }
    }

    debug!(path = %path.display(), bytes = bytes.len(), "Session file written");
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

/// Put back a `.bak` left by a write that crashed between its two renames.
///
/// Only acts when `path` is missing and the backup exists.
pub fn recover_backup(path: &Path) {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => tracing::warn!(
            path = %path.display(),
            "Recovered session file from interrupted write"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            "Failed to recover session backup: {e}"
        ),
    }
}

/// Delete `path`. A file that is already gone counts as success.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Session file removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
