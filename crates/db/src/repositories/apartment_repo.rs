//! Repository for the `apartments` table.
//!
//! Mutations that change tracked fields lock the apartment row
//! (`SELECT ... FOR UPDATE`), diff against the locked state and append the
//! history rows in the same transaction as the row update. Concurrent edits of
//! one apartment are therefore serialized and the current price always equals
//! the newest price history entry.

use chrono::Utc;
use estate_core::apartment::{ApartmentFields, ChangeSet};
use estate_core::pagination::PageWindow;
use estate_core::types::{new_id, Amount, DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::apartment::{Apartment, ApartmentPage, ApartmentWithHistory, UpdateOutcome};
use crate::repositories::{ChangeHistoryRepo, PriceHistoryRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, address, city, area_sqm, rooms, floor, building_year, \
                       current_price, description, created_at, updated_at";

/// Provides CRUD and history-tracking operations for apartments.
pub struct ApartmentRepo;

impl ApartmentRepo {
    /// Insert a new apartment with a fresh identifier, returning the created row.
    ///
    /// No history rows are written on creation.
    pub async fn create(pool: &PgPool, input: &ApartmentFields) -> Result<Apartment, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO apartments
                (id, address, city, area_sqm, rooms, floor, building_year,
                 current_price, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(new_id())
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.area_sqm)
            .bind(input.rooms)
            .bind(input.floor)
            .bind(input.building_year)
            .bind(input.current_price)
            .bind(&input.description)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find an apartment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an apartment together with its price and change history.
    pub async fn find_with_history(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApartmentWithHistory>, sqlx::Error> {
        let Some(apartment) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let price_history = PriceHistoryRepo::list_for_apartment(pool, id).await?;
        let change_history = ChangeHistoryRepo::list_for_apartment(pool, id).await?;
        Ok(Some(ApartmentWithHistory {
            apartment,
            price_history,
            change_history,
        }))
    }

    /// List one window of apartments in creation order, with the total count.
    ///
    /// Count and rows are read from the same snapshot. A window past the end
    /// yields an empty `data` list.
    pub async fn list(pool: &PgPool, window: PageWindow) -> Result<ApartmentPage, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM apartments")
            .fetch_one(&mut *tx)
            .await?;

        let data = if window.limit == 0 {
            Vec::new()
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM apartments
                 ORDER BY created_at ASC, id ASC
                 LIMIT $1 OFFSET $2"
            );
            sqlx::query_as::<_, Apartment>(&query)
                .bind(window.limit)
                .bind(window.skip)
                .fetch_all(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok(ApartmentPage { data, count })
    }

    /// Replace every editable field of an apartment.
    ///
    /// One change history row is appended per field whose value differs, plus a
    /// price history row when the price moved. An edit that changes nothing
    /// writes nothing. Returns `None` if no apartment with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ApartmentFields,
    ) -> Result<Option<UpdateOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };

        let changes = ChangeSet::between(&current.fields(), input);
        if changes.is_empty() {
            tx.commit().await?;
            return Ok(Some(UpdateOutcome {
                apartment: current,
                fields_changed: 0,
                price_changed: false,
            }));
        }

        let now = Utc::now();
        Self::record_changes(&mut tx, id, &changes, now).await?;
        tracing::debug!(
            apartment_id = %id,
            fields = changes.fields.len(),
            price_changed = changes.price.is_some(),
            "Recorded apartment changes"
        );

        let query = format!(
            "UPDATE apartments SET
                address = $2,
                city = $3,
                area_sqm = $4,
                rooms = $5,
                floor = $6,
                building_year = $7,
                current_price = $8,
                description = $9,
                updated_at = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let apartment = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.area_sqm)
            .bind(input.rooms)
            .bind(input.floor)
            .bind(input.building_year)
            .bind(input.current_price)
            .bind(&input.description)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(UpdateOutcome {
            apartment,
            fields_changed: changes.fields.len(),
            price_changed: changes.price.is_some(),
        }))
    }

    /// Set only the price of an apartment.
    ///
    /// A new price equal to the current one is a no-op. Otherwise exactly one
    /// price history row and one `current_price` change row are appended.
    /// Returns `None` if no apartment with `id` exists.
    pub async fn update_price(
        pool: &PgPool,
        id: DbId,
        new_price: Amount,
    ) -> Result<Option<UpdateOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };

        let changes = ChangeSet::for_price(current.current_price, new_price);
        if changes.is_empty() {
            tx.commit().await?;
            return Ok(Some(UpdateOutcome {
                apartment: current,
                fields_changed: 0,
                price_changed: false,
            }));
        }

        let now = Utc::now();
        Self::record_changes(&mut tx, id, &changes, now).await?;
        tracing::debug!(apartment_id = %id, "Recorded price change");

        let query = format!(
            "UPDATE apartments SET current_price = $2, updated_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let apartment = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(new_price)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(UpdateOutcome {
            apartment,
            fields_changed: changes.fields.len(),
            price_changed: true,
        }))
    }

    /// Permanently delete an apartment. History rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of apartments.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM apartments")
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Load and row-lock an apartment for the rest of the transaction.
    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Append the history rows of a change set.
    async fn record_changes(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        changes: &ChangeSet,
        changed_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        if let Some(price) = changes.price {
            PriceHistoryRepo::append(tx, id, price.old_price, price.new_price, changed_at).await?;
        }
        ChangeHistoryRepo::append_all(tx, id, &changes.fields, changed_at).await?;
        Ok(())
    }
}
