/// All primary keys are UUIDs, generated application-side as v7 so they sort
/// by creation time.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts and measured areas. Stored as `NUMERIC(14,2)`.
pub type Amount = rust_decimal::Decimal;

/// Generate a fresh time-ordered identifier.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}
