//! Apartment field constraints and change detection.
//!
//! [`ApartmentInput`] is the wire shape accepted by create and update. Every
//! field is optional on the wire so that missing required fields are reported
//! alongside every other violation instead of failing deserialization early.
//! A successful [`ApartmentInput::validate_fields`] yields [`ApartmentFields`],
//! the fully-typed set of editable attributes.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Constraint constants
// ---------------------------------------------------------------------------

/// Scale of every stored amount (`NUMERIC(14,2)`).
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound of a `NUMERIC(14,2)` column, in whole units.
const AMOUNT_LIMIT_UNITS: i64 = 1_000_000_000_000;

// ---------------------------------------------------------------------------
// Tracked fields
// ---------------------------------------------------------------------------

/// The editable apartment attributes, in the order changes are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentField {
    Address,
    City,
    AreaSqm,
    Rooms,
    Floor,
    BuildingYear,
    CurrentPrice,
    Description,
}

impl ApartmentField {
    pub const ALL: [ApartmentField; 8] = [
        ApartmentField::Address,
        ApartmentField::City,
        ApartmentField::AreaSqm,
        ApartmentField::Rooms,
        ApartmentField::Floor,
        ApartmentField::BuildingYear,
        ApartmentField::CurrentPrice,
        ApartmentField::Description,
    ];

    /// Column / wire name, also stored as `field_name` in change history.
    pub fn as_str(self) -> &'static str {
        match self {
            ApartmentField::Address => "address",
            ApartmentField::City => "city",
            ApartmentField::AreaSqm => "area_sqm",
            ApartmentField::Rooms => "rooms",
            ApartmentField::Floor => "floor",
            ApartmentField::BuildingYear => "building_year",
            ApartmentField::CurrentPrice => "current_price",
            ApartmentField::Description => "description",
        }
    }
}

impl fmt::Display for ApartmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input DTOs
// ---------------------------------------------------------------------------

/// Create / full-edit payload. Unknown JSON fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApartmentInput {
    #[validate(
        required(message = "is required"),
        length(max = 500, message = "must be at most 500 characters"),
        custom(function = not_blank)
    )]
    pub address: Option<String>,

    #[validate(
        required(message = "is required"),
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = not_blank)
    )]
    pub city: Option<String>,

    #[validate(custom(function = valid_amount))]
    pub area_sqm: Option<Amount>,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub rooms: Option<i32>,

    pub floor: Option<i32>,

    #[validate(range(
        min = 1800,
        max = 2100,
        message = "must be between 1800 and 2100"
    ))]
    pub building_year: Option<i32>,

    #[validate(required(message = "is required"), custom(function = valid_amount))]
    pub current_price: Option<Amount>,

    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl ApartmentInput {
    /// Check every constraint and, if all hold, produce the typed field set.
    ///
    /// All violations are collected; the error lists each offending field.
    pub fn validate_fields(self) -> Result<ApartmentFields, CoreError> {
        self.validate()?;

        let (Some(address), Some(city), Some(current_price)) =
            (self.address, self.city, self.current_price)
        else {
            return Err(CoreError::Internal(
                "required apartment fields missing after validation".into(),
            ));
        };

        Ok(ApartmentFields {
            address,
            city,
            area_sqm: self.area_sqm,
            rooms: self.rooms,
            floor: self.floor,
            building_year: self.building_year,
            current_price,
            description: self.description,
        })
    }
}

/// Price-only update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PriceUpdate {
    #[validate(required(message = "is required"), custom(function = valid_amount))]
    pub new_price: Option<Amount>,
}

impl PriceUpdate {
    /// Validate and return the requested price.
    pub fn validate_price(self) -> Result<Amount, CoreError> {
        self.validate()?;
        self.new_price
            .ok_or_else(|| CoreError::invalid_field("new_price", "is required"))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

fn valid_amount(value: &Amount) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative").with_message("must not be negative".into()));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::new("scale")
            .with_message("must have at most 2 decimal places".into()));
    }
    if *value >= Decimal::from(AMOUNT_LIMIT_UNITS) {
        return Err(ValidationError::new("too_large").with_message("is too large".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validated field set
// ---------------------------------------------------------------------------

/// The complete set of editable apartment attributes after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApartmentFields {
    pub address: String,
    pub city: String,
    pub area_sqm: Option<Amount>,
    pub rooms: Option<i32>,
    pub floor: Option<i32>,
    pub building_year: Option<i32>,
    pub current_price: Amount,
    pub description: Option<String>,
}

impl ApartmentFields {
    /// Textual rendering of one field as stored in change history.
    ///
    /// Amounts are normalized so `500000.00` and `500000` render the same.
    pub fn text_value(&self, field: ApartmentField) -> Option<String> {
        match field {
            ApartmentField::Address => Some(self.address.clone()),
            ApartmentField::City => Some(self.city.clone()),
            ApartmentField::AreaSqm => self.area_sqm.map(amount_text),
            ApartmentField::Rooms => self.rooms.map(|v| v.to_string()),
            ApartmentField::Floor => self.floor.map(|v| v.to_string()),
            ApartmentField::BuildingYear => self.building_year.map(|v| v.to_string()),
            ApartmentField::CurrentPrice => Some(amount_text(self.current_price)),
            ApartmentField::Description => self.description.clone(),
        }
    }
}

/// Canonical text for an amount.
pub fn amount_text(value: Amount) -> String {
    value.normalize().to_string()
}

// ---------------------------------------------------------------------------
// Change sets
// ---------------------------------------------------------------------------

/// One field whose value differs between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: ApartmentField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// A price transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    pub old_price: Amount,
    pub new_price: Amount,
}

/// Everything a single mutation must append to the history logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub fields: Vec<FieldChange>,
    pub price: Option<PriceChange>,
}

impl ChangeSet {
    /// Diff two complete field sets: one [`FieldChange`] per differing field,
    /// plus a [`PriceChange`] when the price moved.
    pub fn between(current: &ApartmentFields, next: &ApartmentFields) -> Self {
        let fields = ApartmentField::ALL
            .into_iter()
            .filter_map(|field| {
                let old_value = current.text_value(field);
                let new_value = next.text_value(field);
                (old_value != new_value).then_some(FieldChange {
                    field,
                    old_value,
                    new_value,
                })
            })
            .collect();

        Self {
            fields,
            price: price_change(current.current_price, next.current_price),
        }
    }

    /// Change set for a price-only update. Empty when the price is unchanged.
    pub fn for_price(current: Amount, new_price: Amount) -> Self {
        match price_change(current, new_price) {
            Some(change) => Self {
                fields: vec![FieldChange {
                    field: ApartmentField::CurrentPrice,
                    old_value: Some(amount_text(current)),
                    new_value: Some(amount_text(new_price)),
                }],
                price: Some(change),
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.price.is_none()
    }
}

fn price_change(old_price: Amount, new_price: Amount) -> Option<PriceChange> {
    (old_price != new_price).then_some(PriceChange {
        old_price,
        new_price,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
