//! # Change Events
//!
//! Every successful write publishes an [`InventoryEvent`] so open views
//! (product table, dashboard, chat context) can refresh.
//!
//! ```text
//! add_product ────────┐
//! edit_product ───────┤                        ┌──► subscriber (table)
//! delete_product ─────┼──► EventHub::publish ──┼──► subscriber (dashboard)
//! register_movement ──┘    broadcast(256)      └──► ...
//! ```
//!
//! Publishing never fails: with no subscribers the event is dropped.
//! Slow subscribers see `RecvError::Lagged` and should reload everything.

use inventics_core::MovementType;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ProductAdded {
        product_id: String,
        code: String,
        name: String,
    },
    ProductUpdated {
        product_id: String,
        quantity: i64,
    },
    ProductDeleted {
        product_id: String,
    },
    MovementRecorded {
        movement_id: String,
        product_id: String,
        movement_type: MovementType,
        quantity: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<InventoryEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        EventHub { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: InventoryEvent) {
        trace!(?event, "Publishing inventory event");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();

        hub.publish(InventoryEvent::ProductDeleted {
            product_id: "p1".to_string(),
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            InventoryEvent::ProductDeleted {
                product_id: "p1".to_string()
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = EventHub::new();
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(InventoryEvent::ProductUpdated {
            product_id: "p1".to_string(),
            quantity: 3,
        });
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(InventoryEvent::MovementRecorded {
            movement_id: "m1".to_string(),
            product_id: "p1".to_string(),
            movement_type: MovementType::Outbound,
            quantity: 2,
        })
        .unwrap();

        assert_eq!(json["type"], "movement_recorded");
        assert_eq!(json["movement_type"], "salida");
    }
}
