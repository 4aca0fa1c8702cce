//! The persisted shape of the whole store

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::StorageError;
use crate::core::order::{Order, OrderId};

/// Default name of the durable slot
pub const DEFAULT_SLOT_NAME: &str = "purchase-order-storage";

/// Version written into every slot envelope
pub const SLOT_VERSION: u32 = 0;

/// Every order plus the current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub orders: IndexMap<OrderId, Order>,
    #[serde(default)]
    pub current_order_id: Option<OrderId>,
}

impl StoreSnapshot {
    pub fn current_order(&self) -> Option<&Order> {
        self.current_order_id.and_then(|id| self.orders.get(&id))
    }

    /// Drop a current id that no longer points at an order
    pub fn repair(&mut self) {
        if let Some(id) = self.current_order_id
            && !self.orders.contains_key(&id)
        {
            self.current_order_id = None;
        }
    }
}

#[derive(Serialize)]
struct SlotRef<'a> {
    state: &'a StoreSnapshot,
    version: u32,
}

#[derive(Deserialize)]
struct SlotOwned {
    state: StoreSnapshot,
    #[serde(default)]
    version: u32,
}

/// Encode the slot envelope `{ "state": ..., "version": 0 }`
pub fn encode_slot(slot: &str, snapshot: &StoreSnapshot) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(&SlotRef {
        state: snapshot,
        version: SLOT_VERSION,
    })
    .map_err(|e| StorageError::Serialization {
        slot: slot.to_string(),
        message: e.to_string(),
    })
}

pub fn decode_slot(slot: &str, bytes: &[u8]) -> Result<StoreSnapshot, StorageError> {
    let envelope: SlotOwned =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization {
            slot: slot.to_string(),
            message: e.to_string(),
        })?;
    if envelope.version > SLOT_VERSION {
        tracing::warn!(
            slot,
            version = envelope.version,
            "slot written by a newer version, reading anyway"
        );
    }
    let mut snapshot = envelope.state;
    snapshot.repair();
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_envelope_shape() {
        let mut snapshot = StoreSnapshot::default();
        let order = Order::new("Team A");
        snapshot.current_order_id = Some(order.id);
        snapshot.orders.insert(order.id, order);

        let bytes = encode_slot(DEFAULT_SLOT_NAME, &snapshot).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["version"], 0);
        assert!(json["state"]["currentOrderId"].is_string());

        let decoded = decode_slot(DEFAULT_SLOT_NAME, &bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_dangling_current_id_is_cleared() {
        let bytes = br#"{"state":{"orders":{},"currentOrderId":"6f1c7a43-3f39-4a53-9a3c-5b8f2d0e9a11"},"version":0}"#;
        let decoded = decode_slot("s", bytes).unwrap();
        assert_eq!(decoded.current_order_id, None);
    }

    #[test]
    fn test_garbage_is_a_serialization_error() {
        let err = decode_slot("s", b"not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }
}
