//! Ports the order wizard calls out through
//!
//! Persistence is synchronous because every store mutation persists before it
//! returns. Export and notification are network-bound and therefore async.

use async_trait::async_trait;

use crate::core::error::{ExportError, StorageError};
use crate::core::order::{Customer, ExportKind, ExportRecord, Order};
use crate::core::snapshot::StoreSnapshot;

/// Durable slot holding the whole store
///
/// Implementations write the snapshot as one unit; a reader never sees half
/// of a save.
pub trait SnapshotStore: Send + Sync {
    /// Read the slot, `None` when nothing was ever saved
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError>;

    /// Replace the slot content
    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError>;

    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;
}

/// Destination an order can be exported to
///
/// The sink gets a read-only copy of the order and returns the record to log
/// on success. It never touches the store itself.
#[async_trait]
pub trait ExportSink: Send + Sync {
    fn kind(&self) -> ExportKind;

    async fn export(&self, order: &Order) -> Result<ExportRecord, ExportError>;
}

/// Receives approval requests before an order goes to pending
#[async_trait]
pub trait ApprovalNotifier: Send + Sync {
    async fn notify(&self, order: &Order, customer: &Customer) -> Result<(), ExportError>;
}
