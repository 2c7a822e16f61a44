//! Integration tests for the apartment repository and its history logs.
//!
//! Exercises the full repository layer against a real database:
//! - Create / read / delete
//! - Full edits and price-only edits with their history rows
//! - Listing windows and total count
//! - Cascade of history rows on delete

use estate_core::apartment::{ApartmentFields, ApartmentInput};
use estate_core::pagination::PageWindow;
use estate_core::types::Amount;
use estate_db::repositories::{ApartmentRepo, ChangeHistoryRepo, PriceHistoryRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn price(units: i64) -> Amount {
    Decimal::from(units)
}

fn new_apartment(address: &str, units: i64) -> ApartmentFields {
    ApartmentInput {
        address: Some(address.to_string()),
        city: Some("Warszawa".to_string()),
        current_price: Some(price(units)),
        ..Default::default()
    }
    .validate_fields()
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: create returns the supplied values and no history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_apartment_has_empty_history(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Testowa 1", 500_000))
        .await
        .unwrap();

    assert_eq!(apartment.address, "ul. Testowa 1");
    assert_eq!(apartment.city, "Warszawa");
    assert_eq!(apartment.current_price, price(500_000));
    assert_eq!(apartment.created_at, apartment.updated_at);

    let detail = ApartmentRepo::find_with_history(&pool, apartment.id)
        .await
        .unwrap()
        .expect("apartment should exist");
    assert!(detail.price_history.is_empty());
    assert!(detail.change_history.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_apartment_returns_none(pool: PgPool) {
    let missing = ApartmentRepo::find_by_id(&pool, uuid::Uuid::now_v7())
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: price-only updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_price_appends_both_logs(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Testowa 1", 500_000))
        .await
        .unwrap();

    let outcome = ApartmentRepo::update_price(&pool, apartment.id, price(550_000))
        .await
        .unwrap()
        .expect("apartment should exist");
    assert_eq!(outcome.apartment.current_price, price(550_000));
    assert_eq!(outcome.fields_changed, 1);
    assert!(outcome.price_changed);
    assert!(outcome.apartment.updated_at >= apartment.updated_at);

    let prices = PriceHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].old_price, price(500_000));
    assert_eq!(prices[0].new_price, price(550_000));

    let changes = ChangeHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field_name, "current_price");
    assert_eq!(changes[0].old_value.as_deref(), Some("500000"));
    assert_eq!(changes[0].new_value.as_deref(), Some("550000"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_price_to_same_value_is_noop(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Cicha 2", 300_000))
        .await
        .unwrap();

    let outcome = ApartmentRepo::update_price(&pool, apartment.id, Decimal::new(30_000_000, 2))
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_noop());
    assert_eq!(outcome.apartment.updated_at, apartment.updated_at);

    let detail = ApartmentRepo::find_with_history(&pool, apartment.id)
        .await
        .unwrap()
        .unwrap();
    assert!(detail.price_history.is_empty());
    assert!(detail.change_history.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_price_on_missing_apartment_returns_none(pool: PgPool) {
    let result = ApartmentRepo::update_price(&pool, uuid::Uuid::now_v7(), price(1))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_current_price_tracks_latest_price_entry(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Długa 5", 100_000))
        .await
        .unwrap();

    for units in [110_000, 120_000, 115_000] {
        ApartmentRepo::update_price(&pool, apartment.id, price(units))
            .await
            .unwrap()
            .unwrap();
    }

    let current = ApartmentRepo::find_by_id(&pool, apartment.id)
        .await
        .unwrap()
        .unwrap();
    let latest = PriceHistoryRepo::latest_for_apartment(&pool, apartment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.current_price, latest.new_price);
    assert_eq!(latest.old_price, price(120_000));

    // Most recent first.
    let prices = PriceHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    let news: Vec<_> = prices.iter().map(|p| p.new_price).collect();
    assert_eq!(news, vec![price(115_000), price(120_000), price(110_000)]);
}

// ---------------------------------------------------------------------------
// Test: full edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_records_one_entry_per_changed_field(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Testowa 1", 500_000))
        .await
        .unwrap();

    let mut edit = apartment.fields();
    edit.city = "Kraków".to_string();
    edit.rooms = Some(3);
    edit.building_year = Some(1999);

    let outcome = ApartmentRepo::update(&pool, apartment.id, &edit)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.fields_changed, 3);
    assert!(!outcome.price_changed);
    assert_eq!(outcome.apartment.city, "Kraków");
    assert_eq!(outcome.apartment.rooms, Some(3));

    let mut changes = ChangeHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    changes.sort_by(|a, b| a.field_name.cmp(&b.field_name));
    let summary: Vec<_> = changes
        .iter()
        .map(|c| {
            (
                c.field_name.as_str(),
                c.old_value.as_deref(),
                c.new_value.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("building_year", None, Some("1999")),
            ("city", Some("Warszawa"), Some("Kraków")),
            ("rooms", None, Some("3")),
        ]
    );

    let prices = PriceHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    assert!(prices.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_price_change_writes_price_history(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Polna 3", 400_000))
        .await
        .unwrap();

    let mut edit = apartment.fields();
    edit.current_price = price(420_000);
    edit.description = Some("Balcony".to_string());

    let outcome = ApartmentRepo::update(&pool, apartment.id, &edit)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.fields_changed, 2);
    assert!(outcome.price_changed);

    let detail = ApartmentRepo::find_with_history(&pool, apartment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.apartment.current_price, price(420_000));
    assert_eq!(detail.price_history.len(), 1);
    assert_eq!(detail.price_history[0].old_price, price(400_000));
    assert_eq!(detail.change_history.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_without_changes_is_noop(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Polna 3", 400_000))
        .await
        .unwrap();

    let outcome = ApartmentRepo::update(&pool, apartment.id, &apartment.fields())
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_noop());
    assert_eq!(outcome.apartment.updated_at, apartment.updated_at);

    let changes = ChangeHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    assert!(changes.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_apartment_returns_none(pool: PgPool) {
    let result = ApartmentRepo::update(
        &pool,
        uuid::Uuid::now_v7(),
        &new_apartment("ul. Nowa 9", 1),
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: concurrent price updates are serialized
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_price_updates_keep_invariant(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Rynek 1", 100_000))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for units in 1..=8_i64 {
        let pool = pool.clone();
        let id = apartment.id;
        handles.push(tokio::spawn(async move {
            ApartmentRepo::update_price(&pool, id, price(100_000 + units * 1_000)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap().unwrap();
    }

    let prices = PriceHistoryRepo::list_for_apartment(&pool, apartment.id)
        .await
        .unwrap();
    assert_eq!(prices.len(), 8);

    // Each transition starts where the previous one ended.
    let mut chronological = prices.clone();
    chronological.reverse();
    assert_eq!(chronological[0].old_price, price(100_000));
    for pair in chronological.windows(2) {
        assert_eq!(pair[0].new_price, pair[1].old_price);
    }

    let current = ApartmentRepo::find_by_id(&pool, apartment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.current_price, prices[0].new_price);
}

// ---------------------------------------------------------------------------
// Test: listing windows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_windows_are_disjoint_and_ordered(pool: PgPool) {
    let mut created = Vec::new();
    for i in 0..8 {
        let apartment =
            ApartmentRepo::create(&pool, &new_apartment(&format!("ul. Lista {i}"), 1_000))
                .await
                .unwrap();
        created.push(apartment.id);
    }

    let first = ApartmentRepo::list(&pool, PageWindow::new(0, 5)).await.unwrap();
    let second = ApartmentRepo::list(&pool, PageWindow::new(5, 5)).await.unwrap();

    assert_eq!(first.count, 8);
    assert_eq!(second.count, 8);
    assert_eq!(first.data.len(), 5);
    assert_eq!(second.data.len(), 3);

    let ids: Vec<_> = first
        .data
        .iter()
        .chain(second.data.iter())
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, created);
    assert_eq!(ApartmentRepo::count(&pool).await.unwrap(), 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_zero_limit_or_past_end_is_empty(pool: PgPool) {
    ApartmentRepo::create(&pool, &new_apartment("ul. Jedna 1", 1_000))
        .await
        .unwrap();

    let empty = ApartmentRepo::list(&pool, PageWindow::new(0, 0)).await.unwrap();
    assert!(empty.data.is_empty());
    assert_eq!(empty.count, 1);

    let past_end = ApartmentRepo::list(&pool, PageWindow::for_page(10, 5))
        .await
        .unwrap();
    assert!(past_end.data.is_empty());
    assert_eq!(past_end.count, 1);
}

// ---------------------------------------------------------------------------
// Test: delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_history(pool: PgPool) {
    let apartment = ApartmentRepo::create(&pool, &new_apartment("ul. Stara 7", 200_000))
        .await
        .unwrap();
    ApartmentRepo::update_price(&pool, apartment.id, price(210_000))
        .await
        .unwrap();

    assert!(ApartmentRepo::delete(&pool, apartment.id).await.unwrap());
    assert!(ApartmentRepo::find_by_id(&pool, apartment.id)
        .await
        .unwrap()
        .is_none());

    let orphans: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM apartment_price_history WHERE apartment_id = $1)
              + (SELECT COUNT(*) FROM apartment_change_history WHERE apartment_id = $1)",
    )
    .bind(apartment.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_apartment_returns_false(pool: PgPool) {
    let other = ApartmentRepo::create(&pool, &new_apartment("ul. Zostaje 1", 1_000))
        .await
        .unwrap();

    let deleted = ApartmentRepo::delete(&pool, uuid::Uuid::now_v7()).await.unwrap();
    assert!(!deleted);
    assert_eq!(ApartmentRepo::count(&pool).await.unwrap(), 1);
    assert!(ApartmentRepo::find_by_id(&pool, other.id)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: schema constraints back up the domain validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_price_rejected_by_schema(pool: PgPool) {
    let mut fields = new_apartment("ul. Ujemna 1", 1_000);
    fields.current_price = price(-1);
    let result = ApartmentRepo::create(&pool, &fields).await;
    assert!(result.is_err(), "Negative price should violate a CHECK constraint");
}
