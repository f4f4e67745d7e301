//! Shared types for the shop backend
//!
//! Error codes, response envelope, and data models used by the server and
//! its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
