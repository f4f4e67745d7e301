//! Data models
//!
//! Shared between shop-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), timestamps are Unix millis.

pub mod basket;
pub mod category;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

// Re-exports
pub use basket::*;
pub use category::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use user::*;
