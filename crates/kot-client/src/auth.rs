//! Session token storage.
//!
//! Every request reads the bearer token from a `TokenStore`; a 401 clears
//! it. Two impls:
//! - `MemoryTokenStore` for tests and tokens passed via the environment
//! - `FileTokenStore` which re-reads a token file on every request, so an
//!   operator can drop in a fresh token without restarting

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Ambient bearer token shared by every kitchen request.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when logged out.
    fn token(&self) -> Option<String>;

    /// Forget the token (session expired).
    fn clear(&self);
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.into());
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|slot| slot.clone())
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// Token persisted in a file, one token per file, surrounding whitespace ignored.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(path = %self.path.display(), "session token cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clear session token")
            }
        }
    }
}
