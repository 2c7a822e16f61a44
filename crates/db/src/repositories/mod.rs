//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. History appends take an open
//! transaction instead, so they commit together with the apartment change
//! that caused them.

pub mod apartment_repo;
pub mod change_history_repo;
pub mod price_history_repo;

pub use apartment_repo::ApartmentRepo;
pub use change_history_repo::ChangeHistoryRepo;
pub use price_history_repo::PriceHistoryRepo;
