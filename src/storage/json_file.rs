//! JSON file slot
//!
//! The slot lives at `<dir>/<slot>.json`. Saves write a sibling temp file and
//! rename it over the slot, so a crash mid-write leaves the previous content.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::StorageError;
use crate::core::service::SnapshotStore;
use crate::core::snapshot::{StoreSnapshot, decode_slot, encode_slot};

#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    slot: String,
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Use `<dir>/<slot>.json`, creating `dir` if needed
    pub fn open(dir: impl AsRef<Path>, slot: impl Into<String>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| StorageError::backend("json_file", e))?;
        let slot = slot.into();
        let path = dir.join(format!("{}.json", slot));
        Ok(Self { slot, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => decode_slot(&self.slot, &bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::backend("json_file", e)),
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        let bytes = encode_slot(&self.slot, snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, &bytes).map_err(|e| StorageError::backend("json_file", e))?;
        fs::rename(&temp, &self.path).map_err(|e| StorageError::backend("json_file", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::Order;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSnapshotStore::open(dir.path(), "slot").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_writes_named_slot() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSnapshotStore::open(dir.path().join("nested"), "orders").unwrap();
        let mut snapshot = StoreSnapshot::default();
        let order = Order::new("Team A");
        snapshot.orders.insert(order.id, order);

        store.save(&snapshot).unwrap();
        assert!(store.path().ends_with("nested/orders.json"));
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSnapshotStore::open(dir.path(), "slot").unwrap();
        fs::write(store.path(), b"{").unwrap();
        assert!(matches!(
            store.load(),
            Err(StorageError::Serialization { .. })
        ));
    }
}
