//! Login session storage.
//!
//! The backend issues a bearer token at login. The client never looks for it
//! in ambient state: it is handed a [`SessionStore`] at construction and asks
//! that store for the token on every authenticated request.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing a persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read or written.
    #[error("Session file error: {0}")]
    Io(#[from] io::Error),

    /// The session file exists but is not valid.
    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Holder of the current login token.
pub trait SessionStore: Send + Sync {
    /// Current token, if logged in.
    fn token(&self) -> Option<SecretString>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent store cannot be written.
    fn set_token(&self, token: SecretString) -> Result<(), SessionError>;

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent store cannot be written.
    fn clear_token(&self) -> Result<(), SessionError>;

    /// Whether a token is present.
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

// =============================================================================
// MemorySession
// =============================================================================

/// Session held in memory for the life of the process.
///
/// Clones share the same token.
#[derive(Clone, Default)]
pub struct MemorySession {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl MemorySession {
    /// Empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that starts logged in with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(SecretString::from(token.into())))),
        }
    }
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FileSession
// =============================================================================

/// On-disk layout: `{"token": "..."}`.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Session persisted to a small JSON file so that logins survive between
/// CLI invocations.
///
/// The file is read once when opened; later changes are written through.
pub struct FileSession {
    path: PathBuf,
    cached: MemorySession,
}

impl FileSession {
    /// Open the session stored at `path`. A missing file means logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let cached = MemorySession::new();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let file: SessionFile = serde_json::from_str(&contents)?;
                if !file.token.is_empty() {
                    cached.set_token(SecretString::from(file.token))?;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self { path, cached })
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for FileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSession")
            .field("path", &self.path)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore for FileSession {
    fn token(&self) -> Option<SecretString> {
        self.cached.token()
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        let contents = serde_json::to_string(&SessionFile {
            token: token.expose_secret().to_string(),
        })?;
        write_private(&self.path, &contents)?;
        self.cached.set_token(token)
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.cached.clear_token()
    }
}

/// Write `contents` readable by the owner only.
#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on create; tighten a file that already existed
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}
