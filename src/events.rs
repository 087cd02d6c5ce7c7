//! # Notification Fan-out
//!
//! In-process pub/sub bus broadcasting mutation events to live subscribers.
//!
//! Each topic maps to a lazily created `tokio::sync::broadcast` channel.
//! Delivery is fire-and-forget and at-most-once: publishing to a topic with
//! no receivers is not an error, lagging receivers skip ahead and lose the
//! overwritten backlog, and nothing is replayed after a reconnect. The bus
//! lives in one process only; replicating the service requires an external
//! pub/sub backplane.

use dashmap::DashMap;
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

/// Named channel a subscriber can join.
///
/// Every apartment has its own topic; a handful of events (apartment
/// creation) go to the global topic that every connection receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Apartment(Uuid),
    Global,
}

impl Topic {
    /// Stable string key used to index the channel map.
    pub fn key(&self) -> String {
        match self {
            Topic::Apartment(id) => format!("apartment-{}", id),
            Topic::Global => "global".to_string(),
        }
    }
}

/// Kind of mutation an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ApartmentCreated,
    UnitCreated,
    UnitUpdated,
    TenantCreated,
    PaymentRecorded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ApartmentCreated => "apartment_created",
            EventKind::UnitCreated => "unit_created",
            EventKind::UnitUpdated => "unit_updated",
            EventKind::TenantCreated => "tenant_created",
            EventKind::PaymentRecorded => "payment_recorded",
        }
    }
}

/// Event envelope pushed to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    pub event: EventKind,
    pub payload: JsonValue,
}

impl Envelope {
    pub fn new(event: EventKind, payload: JsonValue) -> Self {
        Self { event, payload }
    }
}

/// Topic-keyed broadcast bus
pub struct EventBus {
    channels: DashMap<String, broadcast::Sender<Envelope>>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Publish an event to a topic.
    ///
    /// A topic nobody has subscribed to yet has no channel; the event is
    /// dropped. A send error means every receiver is gone; both cases are
    /// the at-most-once contract, not failures.
    pub fn publish(&self, topic: &Topic, event: Envelope) {
        counter!("estates_events_published_total").increment(1);

        if let Some(sender) = self.channels.get(&topic.key()) {
            let delivered = sender.send(event).unwrap_or(0);
            tracing::debug!(
                topic = %topic.key(),
                receivers = delivered,
                "Published event"
            );
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub fn subscribe(&self, topic: &Topic) -> broadcast::Receiver<Envelope> {
        let entry = self.channels.entry(topic.key()).or_insert_with(|| {
            let (tx, _rx) = broadcast::channel(self.capacity);
            tx
        });
        entry.subscribe()
    }

    /// Number of topics with a live channel.
    pub fn topic_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bus() -> EventBus {
        EventBus::new(16)
    }

    #[tokio::test]
    async fn subscriber_receives_event_on_its_topic() {
        let bus = bus();
        let apartment = Uuid::new_v4();
        let topic = Topic::Apartment(apartment);

        let mut rx = bus.subscribe(&topic);

        bus.publish(
            &topic,
            Envelope::new(EventKind::UnitUpdated, json!({ "status": "sold" })),
        );

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, EventKind::UnitUpdated);
        assert_eq!(received.payload["status"], "sold");
    }

    #[tokio::test]
    async fn events_do_not_cross_apartment_topics() {
        let bus = bus();
        let topic_a = Topic::Apartment(Uuid::new_v4());
        let topic_b = Topic::Apartment(Uuid::new_v4());

        let mut rx_a = bus.subscribe(&topic_a);
        let mut rx_b = bus.subscribe(&topic_b);

        bus.publish(
            &topic_a,
            Envelope::new(EventKind::TenantCreated, json!({ "tenant": "t1" })),
        );

        assert_eq!(rx_a.recv().await.unwrap().event, EventKind::TenantCreated);
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = bus();
        let topic = Topic::Apartment(Uuid::new_v4());

        // No channel exists and no panic or error surfaces.
        bus.publish(&topic, Envelope::new(EventKind::UnitCreated, json!({})));
        assert_eq!(bus.topic_count(), 0);
    }

    #[tokio::test]
    async fn all_topic_subscribers_receive_the_event() {
        let bus = bus();
        let topic = Topic::Apartment(Uuid::new_v4());

        let mut rx1 = bus.subscribe(&topic);
        let mut rx2 = bus.subscribe(&topic);

        bus.publish(
            &topic,
            Envelope::new(EventKind::PaymentRecorded, json!({ "amount": "1500000" })),
        );

        assert_eq!(rx1.recv().await.unwrap().event, EventKind::PaymentRecorded);
        assert_eq!(rx2.recv().await.unwrap().event, EventKind::PaymentRecorded);
    }

    #[tokio::test]
    async fn global_topic_is_shared() {
        let bus = bus();

        let mut rx = bus.subscribe(&Topic::Global);
        bus.publish(
            &Topic::Global,
            Envelope::new(EventKind::ApartmentCreated, json!({ "name": "Sunrise Towers" })),
        );

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, EventKind::ApartmentCreated);
    }

    #[test]
    fn topic_keys_are_stable() {
        let id: Uuid = "4b8d9f52-9d58-4f0e-8a90-1d9c32a6e001".parse().unwrap();
        assert_eq!(
            Topic::Apartment(id).key(),
            "apartment-4b8d9f52-9d58-4f0e-8a90-1d9c32a6e001"
        );
        assert_eq!(Topic::Global.key(), "global");
    }

    #[test]
    fn envelope_serializes_with_snake_case_kind() {
        let envelope = Envelope::new(EventKind::TenantCreated, json!({ "tenant": {} }));
        let rendered = serde_json::to_value(&envelope).unwrap();
        assert_eq!(rendered["event"], "tenant_created");
    }
}
