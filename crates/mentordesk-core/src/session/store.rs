// ── Persisted session store ──
//
// String key-value persistence shared by the whole console. The login flow
// (outside this crate) writes it; the core only reads, consumes the one-shot
// flag, and clears.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Bearer token issued at login.
pub const TOKEN_KEY: &str = "token";
/// JSON-encoded user record (`{ id, role, ... }`).
pub const USER_KEY: &str = "user";
/// One-shot flag set by the login flow, consumed on first read.
pub const LOGIN_SUCCESS_KEY: &str = "showLoginSuccess";

/// Key-value session persistence.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// Read and remove a key in one step.
    fn take(&self, key: &str) -> Result<Option<String>, CoreError> {
        let value = self.get(key)?;
        if value.is_some() {
            self.remove(key)?;
        }
        Ok(value)
    }

    /// Remove the token and user record.
    fn clear_session(&self) -> Result<(), CoreError> {
        self.remove(TOKEN_KEY)?;
        self.remove(USER_KEY)
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// Process-local store, used by tests and embedders with their own persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from key/value pairs.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// ── File-backed store ────────────────────────────────────────────────

/// A single JSON object on disk (`{ "token": "...", "user": "{...}" }`).
///
/// A missing file is an empty session. Every write rewrites the file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(store_error(&self.path, &e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(|e| store_error(&self.path, &e))
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| store_error(parent, &e))?;
            }
        }
        let body = serde_json::to_string_pretty(map).map_err(|e| store_error(&self.path, &e))?;
        fs::write(&self.path, body).map_err(|e| store_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

fn store_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::SessionStore {
        message: format!("{}: {err}", path.display()),
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let map = self.read_map()?;
        Ok(map.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            // Structured values are kept as their JSON text.
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // An unreadable file cannot hold a usable session; replace it.
        let (mut map, corrupt) = match self.read_map() {
            Ok(map) => (map, false),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                (Map::new(), true)
            }
        };
        if map.remove(key).is_some() || corrupt {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn take_consumes_the_flag() {
        let store = MemorySessionStore::with_entries([(LOGIN_SUCCESS_KEY, "true")]);
        assert_eq!(store.take(LOGIN_SUCCESS_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(store.take(LOGIN_SUCCESS_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, r#"{"id":1,"role":"admin"}"#).unwrap();

        let reopened = FileSessionStore::new(store.path());
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));

        reopened.clear_session().unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_reads_structured_user_as_json_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token":"t","user":{"id":3,"role":"mentor"}}"#).unwrap();

        let store = FileSessionStore::new(&path);
        let user: Value = serde_json::from_str(&store.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user["role"], "mentor");
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        let err = store.get(TOKEN_KEY).unwrap_err();
        assert!(matches!(err, CoreError::SessionStore { .. }));

        store.clear_session().unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }
}
