//! # Order Wizard
//!
//! Engine behind a five-step purchase-order wizard for team uniforms.
//!
//! ## Features
//!
//! - **Order Store**: every order plus the current selection, persisted as one
//!   snapshot slot after each mutation and rehydrated on open
//! - **Step Gate**: which of Product, Artwork, Details, Sizes and PDF are
//!   reachable, derived from the order's content
//! - **Annotation Engine**: details anchored on front/back artwork by
//!   percentage, with pixel conversion, drag handling and reordering
//! - **Size Tally**: grouped per-size rows with optional player names,
//!   collapsed to size groups on save
//! - **Export**: Trello cards (feature `trello`) and approval requests
//! - **REST surface**: axum routes over the store with tracing and CORS
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_wizard::prelude::*;
//!
//! let mut store = OrderStore::in_memory();
//! store.create_order("Eagles U12")?;
//! store.set_category(Some(ProductCategory::Football))?;
//! store.set_product_type(Some(ProductType::Jersey))?;
//! store.set_model(Some(ProductModel::Flex))?;
//! store.navigate_to(WizardStep::Artwork)?;
//!
//! let chart = SizeLabel::standard();
//! let mut tally = SizeTally::expand(&store.require_current()?.size_groups, &chart, 14);
//! let row = tally.add_row(SizeLabel::from("M"));
//! tally.set_quantity(row, 12);
//! tally.save(&mut store)?;
//! ```

pub mod annotation;
pub mod config;
pub mod core;
pub mod export;
pub mod server;
pub mod storage;
pub mod store;
pub mod tally;
pub mod workflow;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        ArtworkView, Customer, Detail, DetailDraft, DetailId, DetailType, ExportKind,
        ExportRecord, Order, OrderId, OrderStatus, OrderSummary, Position, ProductCategory,
        ProductModel, ProductType, SizeGroup, SizeLabel, SizeQuantities,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, ExportError, OrderError, StorageError, ValidationError, WizardError,
    };

    // === Events and queries ===
    pub use crate::core::{EventBus, OrderChange, OrderEvent, OrderFilter, OrderListParams};

    // === Service traits ===
    pub use crate::core::service::{ApprovalNotifier, ExportSink, SnapshotStore};

    // === Store ===
    pub use crate::store::{
        IngestHandle, IngestOutcome, IngestTarget, OrderStore, SharedStore, ingest::spawn_ingest,
    };

    // === Workflow, annotation, tally ===
    pub use crate::annotation::{ArtworkCanvas, ContainerSize, DragHandle, PixelPoint};
    pub use crate::tally::SizeTally;
    pub use crate::workflow::{NavigationState, WizardStep, can_proceed};

    // === Storage ===
    pub use crate::storage::{InMemorySnapshotStore, JsonFileSnapshotStore, open_backend};

    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbSnapshotStore;

    // === Export ===
    pub use crate::export::{LoggingApprovalNotifier, export_current_order, request_approval};

    #[cfg(feature = "trello")]
    pub use crate::export::TrelloExportSink;

    // === Config and server ===
    pub use crate::config::WizardConfig;
    pub use crate::server::{AppState, ServerBuilder};

    // === Re-exports from dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
