use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use super::store::atomic_write;

/// A remote document: top-level fields in insertion order
pub type Document = IndexMap<String, Value>;

/// Collection holding user profile documents, keyed by email
pub const USERS_COLLECTION: &str = "users";

/// Error type for the remote document store
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("document key is empty")]
    EmptyKey,
    #[error("invalid document key {0:?}")]
    InvalidKey(String),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("document {path} is not a JSON object: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("could not encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("remote store rejected the write: {0}")]
    Rejected(String),
}

/// Document store mirroring the profile.
///
/// `update_document` merges the given top-level fields into the stored
/// document, creating it when missing. Whole-record saves and single-field
/// updates both go through it.
pub trait RemoteStore {
    fn get_document(&self, collection: &str, key: &str) -> Result<Option<Document>, RemoteError>;
    fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), RemoteError>;
}

/// Convert a serializable record into document fields
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, RemoteError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(RemoteError::Rejected(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

fn validate_key(key: &str) -> Result<(), RemoteError> {
    if key.is_empty() {
        return Err(RemoteError::EmptyKey);
    }
    if key.contains(['/', '\\']) || key.starts_with('.') || key.chars().any(char::is_control) {
        return Err(RemoteError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// File-backed remote
// ---------------------------------------------------------------------------

/// Documents stored as `<dir>/<collection>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileRemote {
    dir: PathBuf,
}

impl FileRemote {
    pub fn new(dir: &Path) -> Self {
        FileRemote {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, collection: &str, key: &str) -> Result<PathBuf, RemoteError> {
        validate_key(collection)?;
        validate_key(key)?;
        Ok(self.dir.join(collection).join(format!("{}.json", key)))
    }
}

impl RemoteStore for FileRemote {
    fn get_document(&self, collection: &str, key: &str) -> Result<Option<Document>, RemoteError> {
        let path = self.path_for(collection, key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RemoteError::Io { path, source: e }),
        };
        serde_json::from_str::<Document>(&text)
            .map(Some)
            .map_err(|e| RemoteError::Malformed {
                path,
                reason: e.to_string(),
            })
    }

    fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), RemoteError> {
        let path = self.path_for(collection, key)?;
        let mut doc = self.get_document(collection, key)?.unwrap_or_default();
        let changed = fields.len();
        doc.extend(fields);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RemoteError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let text = serde_json::to_string_pretty(&doc)?;
        atomic_write(&path, text.as_bytes()).map_err(|e| RemoteError::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(collection, key, fields = changed, "updated remote document");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory remote
// ---------------------------------------------------------------------------

/// In-memory documents. `set_failing(true)` makes every write fail, which
/// is how tests exercise the all-or-nothing save.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    docs: RefCell<HashMap<(String, String), Document>>,
    failing: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl RemoteStore for MemoryRemote {
    fn get_document(&self, collection: &str, key: &str) -> Result<Option<Document>, RemoteError> {
        validate_key(key)?;
        Ok(self
            .docs
            .borrow()
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), RemoteError> {
        validate_key(key)?;
        if self.failing.get() {
            return Err(RemoteError::Rejected("remote unavailable".into()));
        }
        self.docs
            .borrow_mut()
            .entry((collection.to_string(), key.to_string()))
            .or_default()
            .extend(fields);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
