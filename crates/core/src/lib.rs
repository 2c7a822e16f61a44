//! Domain core for the estate apartment registry.
//!
//! Zero internal dependencies: types, errors, field constraints, change
//! diffing and pagination math shared by the repository and API layers.

pub mod apartment;
pub mod error;
pub mod pagination;
pub mod types;
