//! Repository for the `apartment_price_history` table.
//!
//! Append-only: there are no update or delete operations. Rows disappear only
//! through the cascade when their apartment is deleted.

use estate_core::types::{new_id, Amount, DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::price_history::PriceHistoryEntry;

/// Column list shared across queries.
const COLUMNS: &str = "id, apartment_id, old_price, new_price, changed_at";

/// Provides append and lookup operations for price history.
pub struct PriceHistoryRepo;

impl PriceHistoryRepo {
    /// Append one price transition within an existing transaction.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        apartment_id: DbId,
        old_price: Amount,
        new_price: Amount,
        changed_at: Timestamp,
    ) -> Result<PriceHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartment_price_history (id, apartment_id, old_price, new_price, changed_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceHistoryEntry>(&query)
            .bind(new_id())
            .bind(apartment_id)
            .bind(old_price)
            .bind(new_price)
            .bind(changed_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// All price transitions of an apartment, most recent first.
    ///
    /// Returns an empty list (not an error) when there are none.
    pub async fn list_for_apartment(
        pool: &PgPool,
        apartment_id: DbId,
    ) -> Result<Vec<PriceHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apartment_price_history
             WHERE apartment_id = $1
             ORDER BY changed_at DESC, id DESC"
        );
        sqlx::query_as::<_, PriceHistoryEntry>(&query)
            .bind(apartment_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent price transition of an apartment, if any.
    pub async fn latest_for_apartment(
        pool: &PgPool,
        apartment_id: DbId,
    ) -> Result<Option<PriceHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apartment_price_history
             WHERE apartment_id = $1
             ORDER BY changed_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, PriceHistoryEntry>(&query)
            .bind(apartment_id)
            .fetch_optional(pool)
            .await
    }
}
