//! The order document store
//!
//! [`OrderStore`] owns every order and the current selection. Each mutation
//! runs synchronously: the change is applied, `updatedAt` is refreshed and the
//! whole store is written to its [`SnapshotStore`] before the call returns.
//! When the write fails the change is rolled back, so the in-memory state is
//! always the persisted one.
//!
//! Mutations that name a missing order, detail or export are no-ops that
//! return `Ok(false)`. They neither bump `updatedAt` nor persist.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut store = OrderStore::in_memory();
//! let id = store.create_order("Team A")?;
//! store.set_category(Some(ProductCategory::Football))?;
//! store.set_product_type(Some(ProductType::Jersey))?;
//! assert!(!store.can_proceed(WizardStep::Artwork));
//! store.set_model(Some(ProductModel::Flex))?;
//! assert!(store.can_proceed(WizardStep::Artwork));
//! ```

pub mod ingest;
pub mod navigation;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::annotation::reorder::{move_by_id, reorder_by_ids};
use crate::core::catalog::{ProductCategory, ProductModel, ProductType};
use crate::core::detail::{ArtworkView, Detail, DetailDraft, Position};
use crate::core::error::{OrderError, WizardError};
use crate::core::events::{EventBus, OrderChange, OrderEvent};
use crate::core::order::{Customer, DetailId, ExportRecord, Order, OrderId, OrderStatus};
use crate::core::query::OrderFilter;
use crate::core::service::SnapshotStore;
use crate::core::sizes::SizeGroup;
use crate::core::snapshot::StoreSnapshot;
use crate::storage::InMemorySnapshotStore;
use crate::workflow::{WizardStep, can_proceed};

pub use ingest::{DropReason, IngestHandle, IngestOutcome, IngestTarget, IngestTicket};

/// Owner of all orders and the current order id
pub struct OrderStore {
    state: StoreSnapshot,
    persistence: Arc<dyn SnapshotStore>,
    events: EventBus,
    ingests: ingest::PendingIngests,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders", &self.state.orders.len())
            .field("current_order_id", &self.state.current_order_id)
            .field("backend", &self.persistence.backend_name())
            .finish()
    }
}

impl OrderStore {
    /// Rehydrate from `persistence`, or start empty when the slot is blank
    pub fn open(persistence: Arc<dyn SnapshotStore>) -> Result<Self, WizardError> {
        let state = persistence.load()?.unwrap_or_default();
        tracing::info!(
            backend = persistence.backend_name(),
            orders = state.orders.len(),
            current = ?state.current_order_id,
            "order store opened"
        );
        Ok(Self {
            state,
            persistence,
            events: EventBus::default(),
            ingests: ingest::PendingIngests::default(),
        })
    }

    /// Empty store persisting to memory only
    pub fn in_memory() -> Self {
        Self {
            state: StoreSnapshot::default(),
            persistence: Arc::new(InMemorySnapshotStore::new()),
            events: EventBus::default(),
            ingests: ingest::PendingIngests::default(),
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.state
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.state.orders.get(&id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.state.orders.values()
    }

    pub fn current_order_id(&self) -> Option<OrderId> {
        self.state.current_order_id
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.state.current_order()
    }

    /// The current order, or `NoCurrentOrder`
    pub fn require_current(&self) -> Result<&Order, WizardError> {
        self.current_order()
            .ok_or_else(|| OrderError::NoCurrentOrder.into())
    }

    /// Orders matching `filter`, most recently updated first
    pub fn list_orders(&self, filter: &OrderFilter) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .state
            .orders
            .values()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        orders
    }

    /// Gate check against the current order; false without one
    pub fn can_proceed(&self, next: WizardStep) -> bool {
        self.current_order()
            .is_some_and(|order| can_proceed(order, next))
    }

    // ------------------------------------------------------------------
    // Order lifecycle
    // ------------------------------------------------------------------

    /// Create a draft on step 1 and make it current.
    ///
    /// The title is stored as given; callers validate it first.
    pub fn create_order(&mut self, title: impl Into<String>) -> Result<OrderId, WizardError> {
        let order = Order::new(title);
        let id = order.id;
        let title = order.title.clone();
        let previous_current = self.state.current_order_id;

        self.state.orders.insert(id, order);
        self.state.current_order_id = Some(id);
        if let Err(e) = self.persist() {
            self.state.orders.shift_remove(&id);
            self.state.current_order_id = previous_current;
            return Err(e);
        }

        self.ingests.cancel_not_current(self.state.current_order_id);
        tracing::info!(order_id = %id, title = %title, "order created");
        self.events.publish(OrderEvent::Created { order_id: id, title });
        Ok(id)
    }

    /// Make `id` current. An unknown id clears the selection.
    pub fn load_order(&mut self, id: OrderId) -> Result<bool, WizardError> {
        let found = self.state.orders.contains_key(&id);
        let next = found.then_some(id);
        if self.state.current_order_id == next {
            return Ok(found);
        }

        let previous = self.state.current_order_id;
        self.state.current_order_id = next;
        if let Err(e) = self.persist() {
            self.state.current_order_id = previous;
            return Err(e);
        }

        self.ingests.cancel_not_current(next);
        tracing::debug!(order_id = %id, found, "order loaded");
        Ok(found)
    }

    /// Remove an order, clearing the selection if it was current
    pub fn delete_order(&mut self, id: OrderId) -> Result<bool, WizardError> {
        let Some((index, _, order)) = self.state.orders.shift_remove_full(&id) else {
            return Ok(false);
        };
        let previous_current = self.state.current_order_id;
        if previous_current == Some(id) {
            self.state.current_order_id = None;
        }
        if let Err(e) = self.persist() {
            self.state.orders.shift_insert(index, id, order);
            self.state.current_order_id = previous_current;
            return Err(e);
        }

        self.ingests.cancel_not_current(self.state.current_order_id);
        tracing::info!(order_id = %id, "order deleted");
        self.events.publish(OrderEvent::Deleted { order_id: id });
        Ok(true)
    }

    /// Rename any order, current or not
    pub fn update_order_title(
        &mut self,
        id: OrderId,
        title: impl Into<String>,
    ) -> Result<bool, WizardError> {
        let title = title.into();
        self.mutate_order(id, OrderChange::Title, |order| {
            if order.title == title {
                return false;
            }
            order.title = title;
            true
        })
    }

    /// Move an order along the status table.
    ///
    /// Works on any order, current or not. Re-setting the present status is a
    /// no-op; a `None` customer keeps the one already attached.
    pub fn update_order_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        customer: Option<Customer>,
    ) -> Result<bool, WizardError> {
        let Some(order) = self.state.orders.get(&id) else {
            return Ok(false);
        };
        let from = order.status;
        if from == status {
            return Ok(false);
        }
        if !from.can_transition_to(status) {
            return Err(OrderError::InvalidStatusTransition {
                id,
                from,
                to: status,
            }
            .into());
        }

        let changed = self.apply(id, |order| {
            order.status = status;
            if let Some(customer) = customer {
                order.customer = Some(customer);
            }
            true
        })?;
        if changed {
            tracing::info!(order_id = %id, %from, to = %status, "order status changed");
            self.events.publish(OrderEvent::StatusChanged {
                order_id: id,
                from,
                to: status,
            });
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Product selection and artwork
    // ------------------------------------------------------------------

    /// Clears product type and model
    pub fn set_category(&mut self, category: Option<ProductCategory>) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Product, |order| {
            order.set_category(category);
            true
        })
    }

    /// Clears model
    pub fn set_product_type(
        &mut self,
        product_type: Option<ProductType>,
    ) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Product, |order| {
            order.set_product_type(product_type);
            true
        })
    }

    pub fn set_model(&mut self, model: Option<ProductModel>) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Product, |order| {
            order.set_model(model);
            true
        })
    }

    /// Store an artwork payload verbatim; `None` removes it
    pub fn set_image(
        &mut self,
        view: ArtworkView,
        payload: Option<String>,
    ) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Image, |order| {
            order.set_image(view, payload);
            true
        })
    }

    // ------------------------------------------------------------------
    // Details
    // ------------------------------------------------------------------

    /// Append a detail with a fresh id; `None` without a current order
    pub fn add_detail(&mut self, draft: DetailDraft) -> Result<Option<DetailId>, WizardError> {
        let id = Uuid::new_v4();
        let detail = draft.into_detail(id);
        let added = self.mutate_current(OrderChange::Details, |order| {
            order.details.push(detail);
            true
        })?;
        Ok(added.then_some(id))
    }

    pub fn remove_detail(&mut self, id: DetailId) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Details, |order| {
            let before = order.details.len();
            order.details.retain(|d| d.id != id);
            order.details.len() != before
        })
    }

    /// Move a detail's anchor. Non-finite positions are ignored.
    pub fn update_detail_position(
        &mut self,
        id: DetailId,
        position: Position,
    ) -> Result<bool, WizardError> {
        self.edit_detail(id, position, |detail, position| {
            detail.position = position;
        })
    }

    /// Move a detail's content box without touching its anchor
    pub fn update_detail_content_position(
        &mut self,
        id: DetailId,
        position: Position,
    ) -> Result<bool, WizardError> {
        self.edit_detail(id, position, |detail, position| {
            detail.content_position = Some(position);
        })
    }

    fn edit_detail(
        &mut self,
        id: DetailId,
        position: Position,
        apply: impl FnOnce(&mut Detail, Position),
    ) -> Result<bool, WizardError> {
        if !position.is_finite() {
            tracing::debug!(detail_id = %id, "ignoring non-finite detail position");
            return Ok(false);
        }
        let position = position.clamped();
        self.mutate_current(OrderChange::DetailPosition, |order| {
            match order.detail_mut(id) {
                Some(detail) => {
                    apply(detail, position);
                    true
                }
                None => false,
            }
        })
    }

    /// Replace the value of a detail, e.g. a graphic's image payload
    pub fn update_detail_value(
        &mut self,
        id: DetailId,
        value: impl Into<String>,
    ) -> Result<bool, WizardError> {
        let value = value.into();
        self.mutate_current(OrderChange::Details, |order| match order.detail_mut(id) {
            Some(detail) => {
                detail.value = value;
                true
            }
            None => false,
        })
    }

    /// Apply `ordered_ids` as a stable partial permutation of the details.
    ///
    /// Details missing from the list keep their slot; none is ever dropped.
    pub fn update_details_order(&mut self, ordered_ids: &[DetailId]) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::DetailOrder, |order| {
            let current: Vec<DetailId> = order.details.iter().map(|d| d.id).collect();
            let details = std::mem::take(&mut order.details);
            order.details = reorder_by_ids(details, ordered_ids, |d| d.id);
            order.details.iter().map(|d| d.id).ne(current)
        })
    }

    /// Drag-and-drop reorder: `dragged` takes `target`'s index
    pub fn move_detail(&mut self, dragged: DetailId, target: DetailId) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::DetailOrder, |order| {
            move_by_id(&mut order.details, dragged, target, |d| d.id)
        })
    }

    // ------------------------------------------------------------------
    // Sizes and exports
    // ------------------------------------------------------------------

    /// Replace all size groups
    pub fn update_sizes(&mut self, size_groups: Vec<SizeGroup>) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Sizes, |order| {
            order.size_groups = size_groups;
            true
        })
    }

    /// Append to the current order's export log
    pub fn add_export_record(&mut self, record: ExportRecord) -> Result<bool, WizardError> {
        match self.state.current_order_id {
            Some(id) => self.add_export_record_for(id, record),
            None => Ok(false),
        }
    }

    /// Append to the export log of a specific order
    pub fn add_export_record_for(
        &mut self,
        id: OrderId,
        record: ExportRecord,
    ) -> Result<bool, WizardError> {
        let (kind, record_id) = (record.kind, record.id);
        let added = self.mutate_order(id, OrderChange::Exports, |order| {
            order.exports.push(record);
            true
        })?;
        if added {
            tracing::info!(order_id = %id, kind = kind.as_str(), "export recorded");
            self.events.publish(OrderEvent::Exported {
                order_id: id,
                kind,
                record_id,
            });
        }
        Ok(added)
    }

    pub fn remove_export_record(&mut self, id: Uuid) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Exports, |order| {
            let before = order.exports.len();
            order.exports.retain(|r| r.id != id);
            order.exports.len() != before
        })
    }

    // ------------------------------------------------------------------
    // Mutation plumbing
    // ------------------------------------------------------------------

    fn persist(&self) -> Result<(), WizardError> {
        self.persistence.save(&self.state)?;
        Ok(())
    }

    fn mutate_current<F>(&mut self, change: OrderChange, edit: F) -> Result<bool, WizardError>
    where
        F: FnOnce(&mut Order) -> bool,
    {
        match self.state.current_order_id {
            Some(id) => self.mutate_order(id, change, edit),
            None => Ok(false),
        }
    }

    fn mutate_order<F>(
        &mut self,
        id: OrderId,
        change: OrderChange,
        edit: F,
    ) -> Result<bool, WizardError>
    where
        F: FnOnce(&mut Order) -> bool,
    {
        let changed = self.apply(id, edit)?;
        if changed {
            tracing::debug!(order_id = %id, ?change, "order updated");
            self.events.publish(OrderEvent::Updated {
                order_id: id,
                change,
            });
        }
        Ok(changed)
    }

    /// Run `edit`, then touch and persist, restoring the order if the save
    /// fails. `edit` returns false to signal that nothing changed.
    fn apply<F>(&mut self, id: OrderId, edit: F) -> Result<bool, WizardError>
    where
        F: FnOnce(&mut Order) -> bool,
    {
        let Some(order) = self.state.orders.get_mut(&id) else {
            return Ok(false);
        };
        let before = order.clone();
        if !edit(&mut *order) {
            *order = before;
            return Ok(false);
        }
        order.touch();

        if let Err(e) = self.persist() {
            if let Some(order) = self.state.orders.get_mut(&id) {
                *order = before;
            }
            return Err(e);
        }
        Ok(true)
    }
}

/// An [`OrderStore`] shared between async tasks and request handlers
///
/// Store calls never await, so a plain `RwLock` is enough; guards must not be
/// held across an `.await`.
#[derive(Clone)]
pub struct SharedStore(Arc<RwLock<OrderStore>>);

impl SharedStore {
    pub fn new(store: OrderStore) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, OrderStore>, WizardError> {
        self.0
            .read()
            .map_err(|e| WizardError::Internal(format!("Failed to acquire read lock: {}", e)))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, OrderStore>, WizardError> {
        self.0
            .write()
            .map_err(|e| WizardError::Internal(format!("Failed to acquire write lock: {}", e)))
    }
}

impl From<OrderStore> for SharedStore {
    fn from(store: OrderStore) -> Self {
        Self::new(store)
    }
}
