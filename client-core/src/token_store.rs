//! Persistent storage for the access/refresh token pair.
//!
//! Stores are synchronous and atomic per key. Storage failures never surface
//! as errors: an unreadable store reads as empty, which callers treat as
//! "logged out".

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage key for the short-lived bearer credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the credential used to mint new access tokens.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

pub trait TokenStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn clear(&self, name: &str);
}

/// Both tokens as returned by the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn load_pair(store: &dyn TokenStore) -> Option<TokenPair> {
    Some(TokenPair {
        access_token: store.get(ACCESS_TOKEN_KEY)?,
        refresh_token: store.get(REFRESH_TOKEN_KEY)?,
    })
}

pub fn save_pair(store: &dyn TokenStore, pair: &TokenPair) {
    store.set(ACCESS_TOKEN_KEY, &pair.access_token);
    store.set(REFRESH_TOKEN_KEY, &pair.refresh_token);
}

pub fn clear_pair(store: &dyn TokenStore) {
    store.clear(ACCESS_TOKEN_KEY);
    store.clear(REFRESH_TOKEN_KEY);
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.read().ok()?.get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(name.to_string(), value.to_string());
        }
    }

    fn clear(&self, name: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(name);
        }
    }
}

/// JSON file backed store, one object mapping key to token.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> HashMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Token file unreadable");
                return HashMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Token file corrupt, ignoring");
            HashMap::new()
        })
    }

    fn write_entries(&self, entries: &HashMap<String, String>) {
        let result = serde_json::to_string(entries)
            .map_err(std::io::Error::from)
            .and_then(|json| {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(&self.path, json)
            });

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist tokens");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, name: &str) -> Option<String> {
        let _guard = self.lock.read().ok()?;
        self.read_entries().remove(name)
    }

    fn set(&self, name: &str, value: &str) {
        let Ok(_guard) = self.lock.write() else {
            return;
        };
        let mut entries = self.read_entries();
        entries.insert(name.to_string(), value.to_string());
        self.write_entries(&entries);
    }

    fn clear(&self, name: &str) {
        let Ok(_guard) = self.lock.write() else {
            return;
        };
        let mut entries = self.read_entries();
        if entries.remove(name).is_some() {
            self.write_entries(&entries);
        }
    }
}
