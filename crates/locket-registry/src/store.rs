//! Persistence backend seam
//!
//! The registry persists as a single JSON snapshot of the whole catalog,
//! rewritten after every successful commit. Commits are human-driven and
//! infrequent; rewriting the file is acceptable.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use locket_core::{ContentId, ContentRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durability seam for the registry.
pub trait PersistenceBackend: Send + Sync {
    /// Load the full catalog at startup.
    fn load_all(&self) -> Result<HashMap<ContentId, ContentRecord>, StoreError>;

    /// Flush the full catalog after a commit.
    fn save_all(&self, records: &HashMap<ContentId, ContentRecord>) -> Result<(), StoreError>;
}

/// JSON file snapshot backend.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceBackend for JsonFileStore {
    fn load_all(&self) -> Result<HashMap<ContentId, ContentRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save_all(&self, records: &HashMap<ContentId, ContentRecord>) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory no-op backend for tests and ephemeral deployments.
#[derive(Default)]
pub struct NullStore;

impl PersistenceBackend for NullStore {
    fn load_all(&self) -> Result<HashMap<ContentId, ContentRecord>, StoreError> {
        Ok(HashMap::new())
    }

    fn save_all(&self, _records: &HashMap<ContentId, ContentRecord>) -> Result<(), StoreError> {
        Ok(())
    }
}
