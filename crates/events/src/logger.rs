//! Background subscriber that records every mutation event.
//!
//! [`EventLogger`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes one structured `tracing` record per [`ApartmentEvent`]. It runs as a
//! long-lived task and exits when the bus sender is dropped.

use tokio::sync::broadcast;

use crate::bus::ApartmentEvent;

/// Background service that logs apartment mutation events.
pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<ApartmentEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event = event.kind.name(),
                        apartment_id = %event.apartment_id,
                        payload = %event.payload,
                        at = %event.timestamp,
                        "Apartment mutation"
                    );
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
        logged
    }
}
