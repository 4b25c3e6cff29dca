//! Durable storage for the bearer token and the serialized user profile.
//!
//! The persisted shape is two keys, `token` and `user` (the profile encoded
//! as a JSON string), always written and erased together.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("stored user profile is not valid JSON: {0}")]
    Decode(serde_json::Error),
    #[error("session encode failed: {0}")]
    Encode(serde_json::Error),
}

/// The `(token, user)` pair that survives restarts.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedCredential {
    pub token: String,
    pub user: UserProfile,
}

/// Storage backend for [`PersistedCredential`].
///
/// Implementations must be cheap to query: the transport calls
/// [`SessionStore::token`] before every request.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if any. Read failures count as "no token".
    fn token(&self) -> Option<String>;

    /// Read the full credential. `Ok(None)` unless both keys are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored user is corrupt.
    fn load(&self) -> Result<Option<PersistedCredential>, StoreError>;

    /// Write both keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, credential: &PersistedCredential) -> Result<(), StoreError>;

    /// Replace the stored user, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save_user(&self, user: &UserProfile) -> Result<(), StoreError>;

    /// Erase both keys. Erasing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

impl StoredEntries {
    fn from_credential(credential: &PersistedCredential) -> Result<Self, StoreError> {
        let user = serde_json::to_string(&credential.user).map_err(StoreError::Encode)?;
        Ok(Self { token: Some(credential.token.clone()), user: Some(user) })
    }

    fn credential(&self) -> Result<Option<PersistedCredential>, StoreError> {
        let (Some(token), Some(user)) = (&self.token, &self.user) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }
        let user = serde_json::from_str::<UserProfile>(user).map_err(StoreError::Decode)?;
        Ok(Some(PersistedCredential { token: token.clone(), user }))
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<StoredEntries>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a credential, as if a previous run had logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be encoded.
    pub fn with_credential(credential: &PersistedCredential) -> Result<Self, StoreError> {
        Ok(Self { entries: Mutex::new(StoredEntries::from_credential(credential)?) })
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut StoredEntries) -> R) -> R {
        let mut guard = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.with_entries(|e| e.token.clone())
    }

    fn load(&self) -> Result<Option<PersistedCredential>, StoreError> {
        self.with_entries(|e| e.credential())
    }

    fn save(&self, credential: &PersistedCredential) -> Result<(), StoreError> {
        let entries = StoredEntries::from_credential(credential)?;
        self.with_entries(|e| *e = entries);
        Ok(())
    }

    fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(user).map_err(StoreError::Encode)?;
        self.with_entries(|e| e.user = Some(encoded));
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.with_entries(|e| *e = StoredEntries::default());
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON file store. The file is rewritten atomically (temp file + rename) and
/// removed entirely on [`SessionStore::clear`].
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }

    fn read(&self) -> Result<StoredEntries, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredEntries::default()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_slice(&raw).map_err(StoreError::Decode)
    }

    fn write(&self, entries: &StoredEntries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let encoded = serde_json::to_vec_pretty(entries).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp).map_err(|e| self.io_error(e))?;
            file.write_all(&encoded).map_err(|e| self.io_error(e))?;
            file.sync_all().map_err(|e| self.io_error(e))?;
        }
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        match self.read() {
            Ok(entries) => entries.token.filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::debug!(%error, "session file unreadable; sending request without token");
                None
            }
        }
    }

    fn load(&self) -> Result<Option<PersistedCredential>, StoreError> {
        self.read()?.credential()
    }

    fn save(&self, credential: &PersistedCredential) -> Result<(), StoreError> {
        self.write(&StoredEntries::from_credential(credential)?)
    }

    fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let mut entries = self.read()?;
        entries.user = Some(serde_json::to_string(user).map_err(StoreError::Encode)?);
        self.write(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt as _;
    std::fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
