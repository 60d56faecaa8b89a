//! File-backed session persistence for the CLI.

use std::path::{Path, PathBuf};

use pinmap_core::state::{SessionStore, StoredSession};
use pinmap_core::{Error, Result};

pub const SESSION_FILE_NAME: &str = "session.json";

/// Stores the signed-in user id as JSON. Writes go through a temp file and a
/// rename, so readers see either the old session or the new one.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store kept next to the config file, so `--config` also isolates the
    /// session.
    pub fn beside(config_path: &Path) -> Self {
        let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|error| {
            Error::Storage(format!(
                "Failed to read session at {}: {}",
                self.path.display(),
                error
            ))
        })?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                tracing::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    error
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Storage(format!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        let temp = self.temp_path();
        std::fs::write(&temp, raw)
            .and_then(|()| std::fs::rename(&temp, &self.path))
            .map_err(|error| {
                Error::Storage(format!(
                    "Failed to write session at {}: {}",
                    self.path.display(),
                    error
                ))
            })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::Storage(format!(
                "Failed to remove session at {}: {}",
                self.path.display(),
                error
            ))),
        }
    }
}
