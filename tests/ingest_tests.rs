//! Background image ingestion against a shared store
//!
//! A read that outlives its order's selection must never land on another
//! order.

use std::time::Duration;

use order_wizard::prelude::*;
use order_wizard::store::{DropReason, ingest::ingest_image};
use tokio::sync::oneshot;

const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

fn front() -> IngestTarget {
    IngestTarget::Artwork {
        view: ArtworkView::Front,
    }
}

fn shared_with_order(title: &str) -> (SharedStore, OrderId) {
    let mut store = OrderStore::in_memory();
    let id = store.create_order(title).unwrap();
    (SharedStore::new(store), id)
}

#[tokio::test]
async fn test_read_applies_to_current_order() {
    let (store, id) = shared_with_order("Team A");
    let outcome = ingest_image(&store, front(), async { Ok(PNG.to_string()) })
        .await
        .unwrap();

    assert_eq!(outcome, IngestOutcome::Applied);
    let guard = store.read().unwrap();
    assert_eq!(guard.order(id).unwrap().image(ArtworkView::Front), Some(PNG));
}

#[tokio::test]
async fn test_switching_orders_drops_pending_read() {
    let (store, first) = shared_with_order("Team A");
    let (tx, rx) = oneshot::channel::<String>();

    let handle = spawn_ingest(store.clone(), front(), async move {
        rx.await
            .map_err(|e| WizardError::Internal(e.to_string()))
    })
    .unwrap();
    assert_eq!(handle.ticket().order_id, first);

    let second = store.write().unwrap().create_order("Team B").unwrap();
    tx.send(PNG.to_string()).unwrap();

    assert_eq!(
        handle.join().await.unwrap(),
        IngestOutcome::Dropped(DropReason::Cancelled)
    );
    let guard = store.read().unwrap();
    assert!(!guard.order(first).unwrap().has_image(ArtworkView::Front));
    assert!(!guard.order(second).unwrap().has_image(ArtworkView::Front));
}

#[tokio::test]
async fn test_deleted_order_drops_pending_read() {
    let (store, id) = shared_with_order("Team A");
    let handle = spawn_ingest(store.clone(), front(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(PNG.to_string())
    })
    .unwrap();

    store.write().unwrap().delete_order(id).unwrap();
    assert!(matches!(
        handle.join().await.unwrap(),
        IngestOutcome::Dropped(_)
    ));
    assert_eq!(store.read().unwrap().orders().count(), 0);
}

#[tokio::test]
async fn test_abort_withdraws_ticket() {
    let (store, _) = shared_with_order("Team A");
    let handle = spawn_ingest(store.clone(), front(), std::future::pending()).unwrap();
    assert_eq!(store.read().unwrap().pending_ingests(), 1);

    handle.abort(&store).unwrap();
    assert_eq!(store.read().unwrap().pending_ingests(), 0);
}

#[tokio::test]
async fn test_failed_read_surfaces_error() {
    let (store, id) = shared_with_order("Team A");
    let result = ingest_image(&store, front(), async {
        Err(WizardError::Internal("read failed".to_string()))
    })
    .await;

    assert!(result.is_err());
    let guard = store.read().unwrap();
    assert_eq!(guard.pending_ingests(), 0);
    assert!(!guard.order(id).unwrap().has_image(ArtworkView::Front));
}

#[tokio::test]
async fn test_non_image_payload_is_dropped() {
    let (store, _) = shared_with_order("Team A");
    let outcome = ingest_image(&store, front(), async { Ok("plain text".to_string()) })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Dropped(DropReason::InvalidPayload)
    );
}

#[tokio::test]
async fn test_abandoned_read_withdraws_ticket() {
    let (store, id) = shared_with_order("Team A");
    let read = ingest_image(&store, front(), std::future::pending());
    let timed_out = tokio::time::timeout(Duration::from_millis(10), read).await;

    assert!(timed_out.is_err());
    let guard = store.read().unwrap();
    assert_eq!(guard.pending_ingests(), 0);
    assert!(!guard.order(id).unwrap().has_image(ArtworkView::Front));
}
