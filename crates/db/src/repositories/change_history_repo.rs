//! Repository for the `apartment_change_history` table.

use estate_core::apartment::FieldChange;
use estate_core::types::{new_id, DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::change_history::ChangeHistoryEntry;

/// Column list shared across queries.
const COLUMNS: &str = "id, apartment_id, field_name, old_value, new_value, changed_at";

/// Provides append and lookup operations for field change history.
pub struct ChangeHistoryRepo;

impl ChangeHistoryRepo {
    /// Append one field change within an existing transaction.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        apartment_id: DbId,
        field_name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        changed_at: Timestamp,
    ) -> Result<ChangeHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartment_change_history
                (id, apartment_id, field_name, old_value, new_value, changed_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeHistoryEntry>(&query)
            .bind(new_id())
            .bind(apartment_id)
            .bind(field_name)
            .bind(old_value)
            .bind(new_value)
            .bind(changed_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Append every change of one update, sharing a single timestamp.
    pub async fn append_all(
        tx: &mut Transaction<'_, Postgres>,
        apartment_id: DbId,
        changes: &[FieldChange],
        changed_at: Timestamp,
    ) -> Result<Vec<ChangeHistoryEntry>, sqlx::Error> {
        let mut entries = Vec::with_capacity(changes.len());
        for change in changes {
            let entry = Self::append(
                tx,
                apartment_id,
                change.field.as_str(),
                change.old_value.as_deref(),
                change.new_value.as_deref(),
                changed_at,
            )
            .await?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// All field changes of an apartment, most recent first.
    pub async fn list_for_apartment(
        pool: &PgPool,
        apartment_id: DbId,
    ) -> Result<Vec<ChangeHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apartment_change_history
             WHERE apartment_id = $1
             ORDER BY changed_at DESC, id DESC"
        );
        sqlx::query_as::<_, ChangeHistoryEntry>(&query)
            .bind(apartment_id)
            .fetch_all(pool)
            .await
    }
}
