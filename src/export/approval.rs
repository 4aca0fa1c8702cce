//! Approval notification

use async_trait::async_trait;

use crate::core::error::ExportError;
use crate::core::order::{Customer, Order};
use crate::core::service::ApprovalNotifier;

/// Notifier that only records the request in the log
///
/// Stands in where no mail transport is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingApprovalNotifier;

#[async_trait]
impl ApprovalNotifier for LoggingApprovalNotifier {
    async fn notify(&self, order: &Order, customer: &Customer) -> Result<(), ExportError> {
        tracing::info!(
            order_id = %order.id,
            title = %order.title,
            customer = %customer.full_name,
            email = %customer.email,
            "approval requested"
        );
        Ok(())
    }
}
