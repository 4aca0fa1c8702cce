//! Domain types shared by every layer of the wizard

pub mod catalog;
pub mod detail;
pub mod error;
pub mod events;
pub mod order;
pub mod query;
pub mod service;
pub mod sizes;
pub mod snapshot;
pub mod validation;

pub use catalog::{CatalogEntry, ProductCategory, ProductModel, ProductType, catalog};
pub use detail::{ArtworkView, Detail, DetailDraft, DetailType, Dimensions, NUMBER_SIZES, Position};
pub use error::{
    ConfigError, ExportError, OrderError, StorageError, ValidationError, WizardError,
};
pub use events::{EventBus, EventEnvelope, OrderChange, OrderEvent};
pub use order::{
    Customer, DetailId, ExportKind, ExportRecord, Order, OrderId, OrderStatus, OrderSummary,
    TrelloExportMetadata,
};
pub use query::{OrderFilter, OrderListParams, OrderTag, PaginatedResponse};
pub use service::{ApprovalNotifier, ExportSink, SnapshotStore};
pub use sizes::{STANDARD_SIZES, SizeGroup, SizeLabel, SizeQuantities};
pub use snapshot::{DEFAULT_SLOT_NAME, StoreSnapshot};
pub use validation::{ImagePayload, ValidatedJson};
