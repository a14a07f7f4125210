//! Blob persistence for the file tree.
//!
//! The whole tree is one JSON array of nodes under a single well-known key.
//! [`BlobStore`] abstracts the key/value backend (browser local storage, a
//! file, a test map); the shell never sees anything but strings. Loading is
//! deliberately forgiving: a missing, unreadable or corrupt blob decodes to
//! an empty node list and the shell reseeds from there, so a damaged store
//! never wedges startup.

use crate::tree::Node;
use std::collections::HashMap;
use thiserror::Error;

/// Key the serialized tree is stored under.
///
/// Kept verbatim from earlier releases so existing blobs keep loading.
pub const STORE_KEY: &str = "vscode_fs_v8_release";

/// Storage-level errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    /// The backing store failed to read or write.
    Backend(String),
    #[error("Serialization error: {0}")]
    /// The node list could not be encoded as JSON.
    Serialize(#[from] serde_json::Error),
}

/// A string key/value backend the tree blob lives in.
pub trait BlobStore {
    /// Read the blob stored under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `blob` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;
}

/// In-memory [`BlobStore`], the default backend for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Load the node list from `store`.
///
/// Any failure along the way (backend error, missing key, malformed JSON)
/// yields an empty list; the caller decides whether to reseed.
pub fn load_nodes(store: &dyn BlobStore) -> Vec<Node> {
    let Ok(Some(blob)) = store.read(STORE_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&blob).unwrap_or_default()
}

/// Serialize the full node list and write it to `store`.
pub fn save_nodes(store: &mut dyn BlobStore, nodes: &[Node]) -> Result<(), StorageError> {
    let blob = serde_json::to_string(nodes)?;
    store.write(STORE_KEY, &blob)
}
