//! Cancellable image ingestion
//!
//! Reading an uploaded file happens off the store. A ticket issued before the
//! read binds the result to the order that was current at that time; when the
//! read completes, the payload is applied only if that order still exists and
//! is still current. Switching, creating or deleting orders cancels tickets
//! for orders that are no longer current. A new ticket for the same order and
//! target supersedes the older one, so at most one ticket is pending per
//! target.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::detail::ArtworkView;
use crate::core::error::WizardError;
use crate::core::order::{DetailId, OrderId};
use crate::core::validation::ImagePayload;
use crate::store::{OrderStore, SharedStore};

/// What an ingested image is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestTarget {
    Artwork { view: ArtworkView },
    DetailValue { detail_id: DetailId },
}

/// Claim on a pending image write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestTicket {
    pub id: Uuid,
    pub order_id: OrderId,
    pub target: IngestTarget,
    pub issued_at: DateTime<Utc>,
}

/// Why a completed read was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Cancelled,
    OrderMissing,
    OrderNotCurrent,
    TargetMissing,
    InvalidPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum IngestOutcome {
    Applied,
    Dropped(DropReason),
}

#[derive(Debug, Default)]
pub(crate) struct PendingIngests {
    tickets: HashMap<Uuid, IngestTicket>,
}

impl PendingIngests {
    /// Cancel every ticket whose order is not `current`
    pub(crate) fn cancel_not_current(&mut self, current: Option<OrderId>) {
        let before = self.tickets.len();
        self.tickets
            .retain(|_, ticket| Some(ticket.order_id) == current);
        let cancelled = before - self.tickets.len();
        if cancelled > 0 {
            tracing::debug!(cancelled, "stale ingest tickets cancelled");
        }
    }
}

impl OrderStore {
    /// Issue a ticket bound to the current order
    pub fn begin_ingest(&mut self, target: IngestTarget) -> Result<IngestTicket, WizardError> {
        let order_id = self.require_current()?.id;
        self.ingests
            .tickets
            .retain(|_, pending| pending.order_id != order_id || pending.target != target);
        let ticket = IngestTicket {
            id: Uuid::new_v4(),
            order_id,
            target,
            issued_at: Utc::now(),
        };
        self.ingests.tickets.insert(ticket.id, ticket.clone());
        tracing::debug!(order_id = %order_id, ticket = %ticket.id, "ingest started");
        Ok(ticket)
    }

    /// Withdraw a ticket; its read result will be dropped
    pub fn cancel_ingest(&mut self, ticket_id: Uuid) -> bool {
        self.ingests.tickets.remove(&ticket_id).is_some()
    }

    pub fn pending_ingests(&self) -> usize {
        self.ingests.tickets.len()
    }

    /// Apply a finished read if its ticket is still valid
    pub fn complete_ingest(
        &mut self,
        ticket: &IngestTicket,
        payload: String,
    ) -> Result<IngestOutcome, WizardError> {
        let outcome = self.try_complete(ticket, payload)?;
        if let IngestOutcome::Dropped(reason) = outcome {
            tracing::warn!(
                order_id = %ticket.order_id,
                ticket = %ticket.id,
                ?reason,
                "ingest dropped"
            );
        }
        Ok(outcome)
    }

    fn try_complete(
        &mut self,
        ticket: &IngestTicket,
        payload: String,
    ) -> Result<IngestOutcome, WizardError> {
        if self.ingests.tickets.remove(&ticket.id).is_none() {
            return Ok(IngestOutcome::Dropped(DropReason::Cancelled));
        }
        if self.order(ticket.order_id).is_none() {
            return Ok(IngestOutcome::Dropped(DropReason::OrderMissing));
        }
        if self.current_order_id() != Some(ticket.order_id) {
            return Ok(IngestOutcome::Dropped(DropReason::OrderNotCurrent));
        }
        let Ok(payload) = ImagePayload::parse(payload) else {
            return Ok(IngestOutcome::Dropped(DropReason::InvalidPayload));
        };

        let applied = match ticket.target {
            IngestTarget::Artwork { view } => self.set_image(view, Some(payload.into_inner()))?,
            IngestTarget::DetailValue { detail_id } => {
                self.update_detail_value(detail_id, payload.into_inner())?
            }
        };
        Ok(if applied {
            IngestOutcome::Applied
        } else {
            IngestOutcome::Dropped(DropReason::TargetMissing)
        })
    }
}

/// Begin, await `read`, then complete against the shared store.
///
/// A failed read cancels the ticket and returns its error.
pub async fn ingest_image<F>(
    store: &SharedStore,
    target: IngestTarget,
    read: F,
) -> Result<IngestOutcome, WizardError>
where
    F: Future<Output = Result<String, WizardError>>,
{
    let ticket = store.write()?.begin_ingest(target)?;
    let guard = TicketGuard {
        store,
        ticket_id: Some(ticket.id),
    };
    let read = read.await;
    guard.disarm();
    finish(store, &ticket, read)
}

/// Withdraws the ticket if the caller stops polling before the read ends
struct TicketGuard<'a> {
    store: &'a SharedStore,
    ticket_id: Option<Uuid>,
}

impl TicketGuard<'_> {
    fn disarm(mut self) {
        self.ticket_id = None;
    }
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.ticket_id.take()
            && let Ok(mut store) = self.store.write()
        {
            store.cancel_ingest(id);
        }
    }
}

fn finish(
    store: &SharedStore,
    ticket: &IngestTicket,
    read: Result<String, WizardError>,
) -> Result<IngestOutcome, WizardError> {
    let mut guard = store.write()?;
    match read {
        Ok(payload) => guard.complete_ingest(ticket, payload),
        Err(e) => {
            guard.cancel_ingest(ticket.id);
            Err(e)
        }
    }
}

/// A read running on the tokio runtime
pub struct IngestHandle {
    ticket: IngestTicket,
    task: JoinHandle<Result<IngestOutcome, WizardError>>,
}

impl IngestHandle {
    pub fn ticket(&self) -> &IngestTicket {
        &self.ticket
    }

    /// Stop the read and withdraw the ticket
    pub fn abort(self, store: &SharedStore) -> Result<(), WizardError> {
        self.task.abort();
        store.write()?.cancel_ingest(self.ticket.id);
        Ok(())
    }

    pub async fn join(self) -> Result<IngestOutcome, WizardError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(IngestOutcome::Dropped(DropReason::Cancelled)),
            Err(e) => Err(WizardError::Internal(format!("ingest task failed: {}", e))),
        }
    }
}

/// Issue a ticket now and run `read` in the background
pub fn spawn_ingest<F>(
    store: SharedStore,
    target: IngestTarget,
    read: F,
) -> Result<IngestHandle, WizardError>
where
    F: Future<Output = Result<String, WizardError>> + Send + 'static,
{
    let ticket = store.write()?.begin_ingest(target)?;
    let task_ticket = ticket.clone();
    let task = tokio::spawn(async move {
        let read = read.await;
        finish(&store, &task_ticket, read)
    });
    Ok(IngestHandle { ticket, task })
}
