//! Content registry - the catalog of committed records

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use locket_core::{ContentId, ContentRecord};

use crate::PersistenceBackend;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Should be unreachable given the id generation policy, but checked.
    #[error("duplicate content id: {0}")]
    DuplicateId(ContentId),
}

/// Registry counters for the operator stats summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub records: usize,
    pub assets: usize,
}

#[derive(Default)]
struct Catalog {
    records: HashMap<ContentId, ContentRecord>,
    /// Insertion order, oldest first.
    order: Vec<ContentId>,
}

/// The content catalog.
///
/// Reads take the shared lock; inserts serialize on the exclusive lock.
/// The durability flush runs on a snapshot after the lock is released, so
/// a reader can observe a record while its flush is still pending.
pub struct ContentRegistry {
    catalog: RwLock<Catalog>,
    backend: Arc<dyn PersistenceBackend>,
}

impl ContentRegistry {
    /// Open the registry, loading the catalog from the backend. A load
    /// failure is non-fatal: it is logged and the registry starts empty.
    pub fn open(backend: Arc<dyn PersistenceBackend>) -> Self {
        let records = match backend.load_all() {
            Ok(records) => {
                info!(count = records.len(), "loaded content catalog");
                records
            }
            Err(e) => {
                warn!(error = %e, "failed to load content catalog, starting empty");
                HashMap::new()
            }
        };

        let mut order: Vec<ContentId> = records.keys().cloned().collect();
        order.sort_by_key(|id| records[id].created_at);

        ContentRegistry {
            catalog: RwLock::new(Catalog { records, order }),
            backend,
        }
    }

    /// Pure lookup; absence is a valid result, not an error.
    pub fn get(&self, id: &ContentId) -> Option<ContentRecord> {
        self.catalog.read().records.get(id).cloned()
    }

    /// Insert a new record and trigger a durability flush.
    ///
    /// A flush failure is logged and does not roll back the in-memory
    /// insert: availability over strict durability, a documented gap.
    pub fn put(&self, record: ContentRecord) -> Result<(), RegistryError> {
        let snapshot = {
            let mut catalog = self.catalog.write();
            if catalog.records.contains_key(&record.id) {
                return Err(RegistryError::DuplicateId(record.id));
            }
            catalog.order.push(record.id.clone());
            catalog.records.insert(record.id.clone(), record);
            catalog.records.clone()
        };

        if let Err(e) = self.backend.save_all(&snapshot) {
            warn!(error = %e, "catalog flush failed; in-memory insert kept");
        }
        Ok(())
    }

    /// The n most recently inserted records, in insertion order.
    pub fn list_recent(&self, n: usize) -> Vec<ContentRecord> {
        let catalog = self.catalog.read();
        let start = catalog.order.len().saturating_sub(n);
        catalog.order[start..]
            .iter()
            .filter_map(|id| catalog.records.get(id).cloned())
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        let catalog = self.catalog.read();
        RegistryStats {
            records: catalog.records.len(),
            assets: catalog.records.values().map(|r| r.assets.len()).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.catalog.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.read().records.is_empty()
    }
}
