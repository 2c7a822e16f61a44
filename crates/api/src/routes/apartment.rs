//! Route definitions for the `/apartments` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::apartment;
use crate::state::AppState;

/// Routes mounted at `/apartments`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// PUT    /{id}/price            -> update_price
/// GET    /{id}/history          -> get_with_history
/// GET    /{id}/price-history    -> price_history
/// GET    /{id}/change-history   -> change_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(apartment::list).post(apartment::create))
        .route(
            "/{id}",
            get(apartment::get_by_id)
                .put(apartment::update)
                .delete(apartment::delete),
        )
        .route("/{id}/price", put(apartment::update_price))
        .route("/{id}/history", get(apartment::get_with_history))
        .route("/{id}/price-history", get(apartment::price_history))
        .route("/{id}/change-history", get(apartment::change_history))
}
