use std::sync::Arc;

use estate_events::EventBus;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: estate_db::DbPool,
    /// Bus on which committed apartment mutations are announced.
    pub event_bus: Arc<EventBus>,
}
