//! Request handlers.
//!
//! Handlers validate the request body, delegate to the repositories in
//! `estate_db`, announce committed mutations on the event bus and map errors
//! via [`AppError`](crate::error::AppError).

pub mod apartment;
