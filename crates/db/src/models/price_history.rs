//! Price history entry model.

use estate_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One price transition. Immutable once written (no `updated_at`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceHistoryEntry {
    pub id: DbId,
    pub apartment_id: DbId,
    pub old_price: Amount,
    pub new_price: Amount,
    pub changed_at: Timestamp,
}
