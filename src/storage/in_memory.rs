//! In-memory snapshot slot for testing and development

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::core::error::StorageError;
use crate::core::service::SnapshotStore;
use crate::core::snapshot::{DEFAULT_SLOT_NAME, StoreSnapshot, decode_slot, encode_slot};

/// In-memory slot
///
/// Holds the encoded envelope rather than the snapshot itself, so loads go
/// through the same decoding as the durable backends. Clones share the slot.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    slot: Arc<RwLock<Option<Vec<u8>>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every following save fail, to exercise rollback
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Raw slot content
    pub fn raw(&self) -> Option<Vec<u8>> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        let slot = self
            .slot
            .read()
            .map_err(|e| StorageError::backend("memory", format!("Failed to acquire read lock: {}", e)))?;

        slot.as_deref()
            .map(|bytes| decode_slot(DEFAULT_SLOT_NAME, bytes))
            .transpose()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::backend("memory", "save rejected"));
        }
        let bytes = encode_slot(DEFAULT_SLOT_NAME, snapshot)?;
        let mut slot = self
            .slot
            .write()
            .map_err(|e| StorageError::backend("memory", format!("Failed to acquire write lock: {}", e)))?;
        *slot = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
