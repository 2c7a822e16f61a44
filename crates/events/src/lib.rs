//! Mutation notifications for the estate apartment registry.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, on which every committed apartment mutation is
//!   announced so caches and other consumers can refresh.
//! - [`ApartmentEvent`]: the event envelope.
//! - [`EventLogger`]: background subscriber that records each event through
//!   `tracing`.

pub mod bus;
pub mod logger;

pub use bus::{ApartmentEvent, ApartmentEventKind, EventBus};
pub use logger::EventLogger;
