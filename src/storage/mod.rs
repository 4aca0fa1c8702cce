//! Snapshot slot backends

pub mod in_memory;
pub mod json_file;
#[cfg(feature = "lmdb")]
pub mod lmdb;

use std::sync::Arc;

pub use in_memory::InMemorySnapshotStore;
pub use json_file::JsonFileSnapshotStore;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbSnapshotStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::error::WizardError;
use crate::core::service::SnapshotStore;

/// Build the backend named by the configuration
pub fn open_backend(config: &StorageConfig) -> Result<Arc<dyn SnapshotStore>, WizardError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemorySnapshotStore::new())),
        StorageBackend::JsonFile => Ok(Arc::new(JsonFileSnapshotStore::open(
            &config.path,
            config.slot_name.clone(),
        )?)),
        #[cfg(feature = "lmdb")]
        StorageBackend::Lmdb => Ok(Arc::new(LmdbSnapshotStore::open(
            &config.path,
            config.slot_name.clone(),
        )?)),
        #[cfg(not(feature = "lmdb"))]
        StorageBackend::Lmdb => Err(crate::core::error::ConfigError::InvalidValue {
            field: "storage.backend".to_string(),
            value: "lmdb".to_string(),
            message: "built without the `lmdb` feature".to_string(),
        }
        .into()),
    }
}
