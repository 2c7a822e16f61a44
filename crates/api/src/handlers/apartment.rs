//! Handlers for the `/apartments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use estate_core::apartment::{amount_text, ApartmentInput, PriceUpdate};
use estate_core::types::DbId;
use estate_db::models::apartment::{Apartment, ApartmentPage, ApartmentWithHistory, UpdateOutcome};
use estate_db::models::change_history::ChangeHistoryEntry;
use estate_db::models::price_history::PriceHistoryEntry;
use estate_db::repositories::{ApartmentRepo, ChangeHistoryRepo, PriceHistoryRepo};
use estate_events::{ApartmentEvent, ApartmentEventKind};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/apartments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ApartmentInput>,
) -> AppResult<(StatusCode, Json<Apartment>)> {
    let fields = input.validate_fields()?;
    let apartment = ApartmentRepo::create(&state.pool, &fields).await?;

    tracing::info!(apartment_id = %apartment.id, city = %apartment.city, "Apartment created");
    state.event_bus.publish(
        ApartmentEvent::new(ApartmentEventKind::Created, apartment.id)
            .with_payload(json!({ "current_price": amount_text(apartment.current_price) })),
    );

    Ok((StatusCode::CREATED, Json(apartment)))
}

/// GET /api/v1/apartments
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApartmentPage>> {
    let page = ApartmentRepo::list(&state.pool, params.window()).await?;
    Ok(Json(page))
}

/// GET /api/v1/apartments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Apartment>> {
    let apartment = ApartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::apartment_not_found(id))?;
    Ok(Json(apartment))
}

/// GET /api/v1/apartments/{id}/history
pub async fn get_with_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApartmentWithHistory>> {
    let detail = ApartmentRepo::find_with_history(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::apartment_not_found(id))?;
    Ok(Json(detail))
}

/// GET /api/v1/apartments/{id}/price-history
pub async fn price_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<PriceHistoryEntry>>> {
    ensure_exists(&state, id).await?;
    let entries = PriceHistoryRepo::list_for_apartment(&state.pool, id).await?;
    Ok(Json(entries))
}

/// GET /api/v1/apartments/{id}/change-history
pub async fn change_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ChangeHistoryEntry>>> {
    ensure_exists(&state, id).await?;
    let entries = ChangeHistoryRepo::list_for_apartment(&state.pool, id).await?;
    Ok(Json(entries))
}

/// PUT /api/v1/apartments/{id}
///
/// Replaces every editable field; optional fields absent from the body are
/// cleared.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApartmentInput>,
) -> AppResult<Json<Apartment>> {
    let fields = input.validate_fields()?;
    let outcome = ApartmentRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| AppError::apartment_not_found(id))?;

    announce_update(&state, &outcome);
    Ok(Json(outcome.apartment))
}

/// PUT /api/v1/apartments/{id}/price
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PriceUpdate>,
) -> AppResult<Json<Apartment>> {
    let new_price = input.validate_price()?;
    let outcome = ApartmentRepo::update_price(&state.pool, id, new_price)
        .await?
        .ok_or_else(|| AppError::apartment_not_found(id))?;

    announce_update(&state, &outcome);
    Ok(Json(outcome.apartment))
}

/// DELETE /api/v1/apartments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !ApartmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::apartment_not_found(id));
    }

    tracing::info!(apartment_id = %id, "Apartment deleted");
    state
        .event_bus
        .publish(ApartmentEvent::new(ApartmentEventKind::Deleted, id));
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ApartmentRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::apartment_not_found(id))
}

/// Log and publish the events for a committed update. No-ops are silent.
fn announce_update(state: &AppState, outcome: &UpdateOutcome) {
    if outcome.is_noop() {
        tracing::debug!(apartment_id = %outcome.apartment.id, "Update changed nothing");
        return;
    }

    let apartment = &outcome.apartment;
    tracing::info!(
        apartment_id = %apartment.id,
        fields_changed = outcome.fields_changed,
        price_changed = outcome.price_changed,
        "Apartment updated",
    );

    if outcome.price_changed {
        state.event_bus.publish(
            ApartmentEvent::new(ApartmentEventKind::PriceChanged, apartment.id)
                .with_payload(json!({ "new_price": amount_text(apartment.current_price) })),
        );
    }
    state.event_bus.publish(
        ApartmentEvent::new(ApartmentEventKind::Updated, apartment.id)
            .with_payload(json!({ "fields_changed": outcome.fields_changed })),
    );
}
