//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ApartmentEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use estate_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ApartmentEvent
// ---------------------------------------------------------------------------

/// What happened to the apartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentEventKind {
    Created,
    Updated,
    PriceChanged,
    Deleted,
}

impl ApartmentEventKind {
    /// Dot-separated event name, e.g. `"apartment.price_changed"`.
    pub fn name(self) -> &'static str {
        match self {
            ApartmentEventKind::Created => "apartment.created",
            ApartmentEventKind::Updated => "apartment.updated",
            ApartmentEventKind::PriceChanged => "apartment.price_changed",
            ApartmentEventKind::Deleted => "apartment.deleted",
        }
    }
}

/// A committed mutation of one apartment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApartmentEvent {
    pub kind: ApartmentEventKind,

    pub apartment_id: DbId,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ApartmentEvent {
    /// Create an event with an empty payload.
    pub fn new(kind: ApartmentEventKind, apartment_id: DbId) -> Self {
        Self {
            kind,
            apartment_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ApartmentEvent`].
///
/// # Usage
///
/// ```rust
/// use estate_events::bus::{ApartmentEvent, ApartmentEventKind, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ApartmentEvent::new(ApartmentEventKind::Created, uuid::Uuid::nil()));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ApartmentEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ApartmentEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ApartmentEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
