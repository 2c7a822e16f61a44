//! Change history entry model.

use estate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One changed field of one update. Immutable once written.
///
/// `old_value` / `new_value` are `None` when the field was unset on that side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeHistoryEntry {
    pub id: DbId,
    pub apartment_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_at: Timestamp,
}
