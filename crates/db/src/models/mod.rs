//! Row models and response shapes.
//!
//! Input DTOs and validation live in `estate_core::apartment`; this module
//! only holds what is read back from the database.

pub mod apartment;
pub mod change_history;
pub mod price_history;
