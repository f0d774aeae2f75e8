use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use trivia_types::User;

/// Local persisted identity: one JSON blob remembering the logged-in user
/// across launches. Cleared on explicit logout.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable session file restores nothing.
    pub fn load(&self) -> Option<User> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                None
            }
        }
    }

    pub fn save(&self, user: &User) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(user).map_err(io::Error::other)?;
        fs::write(&self.path, raw)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
