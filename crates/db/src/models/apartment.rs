//! Apartment entity model and response shapes.

use estate_core::apartment::ApartmentFields;
use estate_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::change_history::ChangeHistoryEntry;
use crate::models::price_history::PriceHistoryEntry;

/// An apartment row from the `apartments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Apartment {
    pub id: DbId,
    pub address: String,
    pub city: String,
    pub area_sqm: Option<Amount>,
    pub rooms: Option<i32>,
    pub floor: Option<i32>,
    pub building_year: Option<i32>,
    pub current_price: Amount,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Apartment {
    /// The editable attributes of this row, for diffing against an edit.
    pub fn fields(&self) -> ApartmentFields {
        ApartmentFields {
            address: self.address.clone(),
            city: self.city.clone(),
            area_sqm: self.area_sqm,
            rooms: self.rooms,
            floor: self.floor,
            building_year: self.building_year,
            current_price: self.current_price,
            description: self.description.clone(),
        }
    }
}

/// One window of the apartment listing plus the unwindowed total.
#[derive(Debug, Clone, Serialize)]
pub struct ApartmentPage {
    pub data: Vec<Apartment>,
    pub count: i64,
}

/// Detail view: the apartment with both history logs, most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct ApartmentWithHistory {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub price_history: Vec<PriceHistoryEntry>,
    pub change_history: Vec<ChangeHistoryEntry>,
}

/// Result of an update or price update on an existing apartment.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The apartment as stored after the operation.
    pub apartment: Apartment,
    /// Number of change history entries appended.
    pub fields_changed: usize,
    /// Whether a price history entry was appended.
    pub price_changed: bool,
}

impl UpdateOutcome {
    /// `true` when the operation wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.fields_changed == 0
    }
}
