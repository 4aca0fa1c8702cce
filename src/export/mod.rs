//! Export and approval boundary
//!
//! Sinks and notifiers work on a copy of the order taken under the lock; the
//! lock is released while they run. The order is only written back after a
//! sink succeeded, so a failed export leaves it untouched.

pub mod approval;
#[cfg(feature = "trello")]
pub mod trello;

pub use approval::LoggingApprovalNotifier;
#[cfg(feature = "trello")]
pub use trello::TrelloExportSink;

use crate::core::error::{OrderError, WizardError};
use crate::core::order::{Customer, ExportRecord, Order, OrderId, OrderStatus};
use crate::core::service::{ApprovalNotifier, ExportSink};
use crate::core::validation::validate_customer;
use crate::store::SharedStore;

/// Card/message body describing an order's product selection
pub fn card_description(order: &Order) -> String {
    let mut description = format!(
        "Purchase Order created on {}\n\nCategory: {}\nProduct Type: {}",
        order.created_at.format("%Y-%m-%d"),
        order.category.map(|c| c.label()).unwrap_or("-"),
        order.product_type.map(|t| t.label()).unwrap_or("-"),
    );
    if let Some(model) = order.model {
        description.push_str(&format!("\nModel: {}", model));
    }
    description
}

/// Export the current order and log the record on it.
///
/// The record is appended to the order that was exported, even if another
/// order became current meanwhile.
pub async fn export_current_order(
    store: &SharedStore,
    sink: &dyn ExportSink,
) -> Result<ExportRecord, WizardError> {
    let order = store.read()?.require_current()?.clone();

    let record = match sink.export(&order).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(order_id = %order.id, kind = sink.kind().as_str(), error = %e, "export failed");
            return Err(e.into());
        }
    };

    let added = store.write()?.add_export_record_for(order.id, record.clone())?;
    if !added {
        tracing::warn!(order_id = %order.id, "order deleted during export, record not kept");
    }
    Ok(record)
}

/// Validate the customer, notify, then move the order from draft to pending.
///
/// Nothing is written when validation or notification fails.
pub async fn request_approval(
    store: &SharedStore,
    notifier: &dyn ApprovalNotifier,
    order_id: OrderId,
    customer: Customer,
) -> Result<Order, WizardError> {
    validate_customer(&customer)?;

    let order = store
        .read()?
        .order(order_id)
        .cloned()
        .ok_or(OrderError::NotFound { id: order_id })?;
    if !order.status.can_transition_to(OrderStatus::Pending) {
        return Err(OrderError::InvalidStatusTransition {
            id: order_id,
            from: order.status,
            to: OrderStatus::Pending,
        }
        .into());
    }

    notifier.notify(&order, &customer).await?;

    let mut guard = store.write()?;
    guard.update_order_status(order_id, OrderStatus::Pending, Some(customer))?;
    guard
        .order(order_id)
        .cloned()
        .ok_or_else(|| OrderError::NotFound { id: order_id }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{ProductCategory, ProductModel, ProductType};
    use crate::core::error::ExportError;
    use crate::core::order::{ExportKind, TrelloExportMetadata};
    use crate::store::OrderStore;
    use async_trait::async_trait;

    struct FixedSink(Result<(), u16>);

    #[async_trait]
    impl ExportSink for FixedSink {
        fn kind(&self) -> ExportKind {
            ExportKind::Trello
        }

        async fn export(&self, order: &Order) -> Result<ExportRecord, ExportError> {
            match self.0 {
                Ok(()) => Ok(TrelloExportMetadata {
                    card_id: order.id.to_string(),
                    card_url: "https://trello.com/c/x".into(),
                    board_name: "Your Board".into(),
                    list_id: "list".into(),
                    list_name: "Orders".into(),
                }
                .into_record()),
                Err(status) => Err(ExportError::Rejected {
                    sink: "trello".into(),
                    status,
                    message: "nope".into(),
                }),
            }
        }
    }

    fn shared() -> SharedStore {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();
        SharedStore::new(store)
    }

    #[test]
    fn test_card_description() {
        let mut order = Order::new("Team A");
        order.set_category(Some(ProductCategory::Football));
        order.set_product_type(Some(ProductType::Jersey));
        let plain = card_description(&order);
        assert!(plain.starts_with("Purchase Order created on "));
        assert!(plain.contains("Category: Football\nProduct Type: Jersey"));
        assert!(!plain.contains("Model"));

        order.set_model(Some(ProductModel::Velocity));
        assert!(card_description(&order).ends_with("\nModel: Velocity"));
    }

    #[tokio::test]
    async fn test_successful_export_is_logged() {
        let store = shared();
        let record = export_current_order(&store, &FixedSink(Ok(()))).await.unwrap();
        let guard = store.read().unwrap();
        let exports = &guard.current_order().unwrap().exports;
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].id, record.id);
    }

    #[tokio::test]
    async fn test_failed_export_leaves_order_untouched() {
        let store = shared();
        let before = store.read().unwrap().current_order().unwrap().clone();
        let err = export_current_order(&store, &FixedSink(Err(401)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_REJECTED");
        assert_eq!(store.read().unwrap().current_order().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_approval_moves_to_pending() {
        let store = shared();
        let id = store.read().unwrap().current_order_id().unwrap();
        let order = request_approval(
            &store,
            &LoggingApprovalNotifier,
            id,
            Customer::new("Jo Coach", "jo@club.com"),
        )
        .await
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer.unwrap().email, "jo@club.com");
    }

    #[tokio::test]
    async fn test_invalid_customer_never_reaches_store() {
        let store = shared();
        let id = store.read().unwrap().current_order_id().unwrap();
        let err = request_approval(
            &store,
            &LoggingApprovalNotifier,
            id,
            Customer::new("Jo", "not-an-email"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let guard = store.read().unwrap();
        assert_eq!(guard.order(id).unwrap().status, OrderStatus::Draft);
    }
}
