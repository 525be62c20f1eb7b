//! Client-side token persistence.
//!
//! The token lives in a single file under a fixed name in the platform
//! config directory, the local-storage analog. Losing the file simply
//! means the next launch starts unauthenticated.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

/// Fixed storage key, the file name the token is saved under.
const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at the platform config directory, created if missing.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "dashboard-tui")
            .context("Could not determine a config directory")?;
        let dir = dirs.config_dir().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir {}", dir.display()))?;
        Ok(Self {
            path: dir.join(TOKEN_FILE),
        })
    }

    /// Store rooted at an explicit directory (tests, overrides).
    pub fn at(dir: &Path) -> Self {
        Self {
            path: dir.join(TOKEN_FILE),
        }
    }

    /// Load the persisted token, if any. An unreadable or empty file counts
    /// as no token.
    pub fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn save(&self, token: &str) -> Result<()> {
        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token to {}", self.path.display()))?;
        debug!("Token persisted");
        Ok(())
    }

    /// Remove the persisted token. Missing file is not an error, clearing
    /// must succeed unconditionally.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
        debug!("Token cleared");
    }
}
