//! LMDB snapshot slot using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store, no external server required. The
//! environment holds one named database, `slots`, keyed by slot name; the
//! value is the JSON envelope. A save is a single write transaction, so a
//! reader sees either the old snapshot or the new one.
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

use crate::core::error::StorageError;
use crate::core::service::SnapshotStore;
use crate::core::snapshot::{StoreSnapshot, decode_slot, encode_slot};

fn lmdb_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::backend("lmdb", err)
}

/// LMDB-backed slot
///
/// The `Env` is wrapped in an `Arc` for cheap cloning.
///
/// # Example
///
/// ```rust,ignore
/// let slot = LmdbSnapshotStore::open("/var/lib/order-wizard", "purchase-order-storage")?;
/// let store = OrderStore::open(Arc::new(slot))?;
/// ```
#[derive(Clone)]
pub struct LmdbSnapshotStore {
    env: Arc<Env>,
    db: Database<Str, Bytes>,
    slot: String,
}

impl LmdbSnapshotStore {
    /// Open (or create) an LMDB environment at `path`.
    ///
    /// The map size is a 256 MB address space reservation, not an allocation.
    pub fn open(path: impl AsRef<Path>, slot: impl Into<String>) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path.as_ref()).map_err(lmdb_error)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(256 * 1024 * 1024)
                .max_dbs(4)
                .max_readers(126)
                .open(path.as_ref())
                .map_err(lmdb_error)?
        };

        let mut wtxn = env.write_txn().map_err(lmdb_error)?;
        let db: Database<Str, Bytes> = env
            .create_database(&mut wtxn, Some("slots"))
            .map_err(lmdb_error)?;
        wtxn.commit().map_err(lmdb_error)?;

        Ok(Self {
            env: Arc::new(env),
            db,
            slot: slot.into(),
        })
    }
}

impl SnapshotStore for LmdbSnapshotStore {
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        let rtxn = self.env.read_txn().map_err(lmdb_error)?;
        match self.db.get(&rtxn, &self.slot).map_err(lmdb_error)? {
            Some(bytes) => decode_slot(&self.slot, bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        let bytes = encode_slot(&self.slot, snapshot)?;
        let mut wtxn = self.env.write_txn().map_err(lmdb_error)?;
        self.db
            .put(&mut wtxn, &self.slot, &bytes)
            .map_err(lmdb_error)?;
        wtxn.commit().map_err(lmdb_error)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "lmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::Order;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let slot = LmdbSnapshotStore::open(dir.path(), "orders").unwrap();
        assert!(slot.load().unwrap().is_none());

        let mut snapshot = StoreSnapshot::default();
        let order = Order::new("Team A");
        snapshot.current_order_id = Some(order.id);
        snapshot.orders.insert(order.id, order);
        slot.save(&snapshot).unwrap();

        assert_eq!(slot.clone().load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_slots_are_independent() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let a = LmdbSnapshotStore::open(dir.path(), "a").unwrap();
        a.save(&StoreSnapshot::default()).unwrap();
        let b = LmdbSnapshotStore {
            slot: "b".to_string(),
            ..a.clone()
        };
        assert!(b.load().unwrap().is_none());
        assert!(a.load().unwrap().is_some());
    }
}
