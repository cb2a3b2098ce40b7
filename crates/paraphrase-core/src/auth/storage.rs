//! Token persistence backends.
//!
//! Every backend holds at most one string entry, keyed `auth_token`.
//! An absent entry means "logged out".

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key under which the raw bearer token is stored.
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

/// Keyring service name
const SERVICE_NAME: &str = "paraphrase-client";

/// Token file name in the cache directory
const TOKEN_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Persistent home of the bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, token: &str) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether entries outlive the process.
    fn is_persistent(&self) -> bool {
        true
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Non-persistent store, lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

// ============================================================================
// File
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    auth_token: String,
}

/// JSON file in the cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_FILE)
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Readers see either the old file or the new one, never a partial write
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl TokenStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let file: TokenFile = serde_json::from_str(&contents)?;
        Ok(Some(file.auth_token))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(&TokenFile {
            auth_token: token.to_string(),
        })?;
        Self::write_atomic(&self.path(), &contents)
    }

    fn remove(&self) -> Result<(), StorageError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

// ============================================================================
// Keyring
// ============================================================================

/// True on targets where keyring is built with a native credential store.
/// Elsewhere it falls back to a mock store that forgets entries on exit.
pub const NATIVE_KEYCHAIN: bool = cfg!(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "windows",
    target_os = "linux"
));

/// OS keychain entry.
pub struct KeyringStore {
    entry: Entry,
}

impl KeyringStore {
    pub fn new() -> Result<Self, StorageError> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_STORAGE_KEY)?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.entry.set_password(token)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "keyring"
    }

    fn is_persistent(&self) -> bool {
        NATIVE_KEYCHAIN
    }
}
