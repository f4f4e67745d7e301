//! Database access layer
//!
//! Free functions over `&PgPool`, one module per table group. Errors are raw
//! `sqlx::Error`; callers map them through `ServiceError`.

pub mod basket;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;
