//! Order change notifications
//!
//! The EventBus uses `tokio::sync::broadcast` to decouple store mutations
//! from whoever wants to hear about them (log sinks, push channels, tests).
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(1024);
//! let mut rx = event_bus.subscribe();
//!
//! event_bus.publish(OrderEvent::Created {
//!     order_id: Uuid::new_v4(),
//!     title: "Team A".to_string(),
//! });
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::core::order::{ExportKind, OrderStatus};

/// Which part of an order an update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChange {
    Title,
    Step,
    Product,
    Image,
    Details,
    DetailPosition,
    DetailOrder,
    Sizes,
    Exports,
}

/// Events emitted by the order store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderEvent {
    Created {
        order_id: Uuid,
        title: String,
    },
    Updated {
        order_id: Uuid,
        change: OrderChange,
    },
    Deleted {
        order_id: Uuid,
    },
    StatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    Exported {
        order_id: Uuid,
        kind: ExportKind,
        record_id: Uuid,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Created { order_id, .. }
            | OrderEvent::Updated { order_id, .. }
            | OrderEvent::Deleted { order_id }
            | OrderEvent::StatusChanged { order_id, .. }
            | OrderEvent::Exported { order_id, .. } => *order_id,
        }
    }

    pub fn action(&self) -> &str {
        match self {
            OrderEvent::Created { .. } => "created",
            OrderEvent::Updated { .. } => "updated",
            OrderEvent::Deleted { .. } => "deleted",
            OrderEvent::StatusChanged { .. } => "status_changed",
            OrderEvent::Exported { .. } => "exported",
        }
    }
}

/// Envelope wrapping an order event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: OrderEvent,
}

impl EventEnvelope {
    pub fn new(event: OrderEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone and shareable across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering `capacity` events before slow receivers lag
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never blocks and never fails. Returns the number of receivers reached.
    pub fn publish(&self, event: OrderEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() only errors when nobody listens
        self.sender.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updated_event_serialization() {
        let event = OrderEvent::Updated {
            order_id: Uuid::new_v4(),
            change: OrderChange::DetailOrder,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "updated");
        assert_eq!(json["change"], "detail_order");
    }

    #[test]
    fn test_status_changed_accessors() {
        let order_id = Uuid::new_v4();
        let event = OrderEvent::StatusChanged {
            order_id,
            from: OrderStatus::Draft,
            to: OrderStatus::Pending,
        };
        assert_eq!(event.order_id(), order_id);
        assert_eq!(event.action(), "status_changed");
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let order_id = Uuid::new_v4();
        let receivers = bus.publish(OrderEvent::Deleted { order_id });
        assert_eq!(receivers, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.order_id(), order_id);
        assert_eq!(received.event.action(), "deleted");
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.publish(OrderEvent::Created {
            order_id: Uuid::new_v4(),
            title: "Team A".to_string(),
        });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(
            bus.publish(OrderEvent::Deleted {
                order_id: Uuid::new_v4()
            }),
            0
        );
    }
}
