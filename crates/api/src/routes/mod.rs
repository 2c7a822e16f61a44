pub mod apartment;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /apartments                         list, create
/// /apartments/{id}                    get, update, delete
/// /apartments/{id}/price              update price (PUT)
/// /apartments/{id}/history            apartment with both history logs
/// /apartments/{id}/price-history      price history, most recent first
/// /apartments/{id}/change-history     change history, most recent first
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/apartments", apartment::router())
}
