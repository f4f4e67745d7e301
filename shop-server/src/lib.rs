//! shop-server: e-commerce backend
//!
//! REST API for catalog browsing, baskets, and order placement on PostgreSQL.
//!
//! ```text
//! shop-server/src/
//! ├── config.rs      # environment configuration
//! ├── state.rs       # shared application state
//! ├── error.rs       # service-layer error bridge
//! ├── auth/          # JWT authentication, role gates
//! ├── checkout/      # basket-to-order conversion engine
//! ├── db/            # SQL queries
//! └── api/           # HTTP routes and handlers
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod util;

pub use auth::{CurrentUser, JwtService};
pub use checkout::{CheckoutError, CheckoutService};
pub use config::Config;
pub use state::AppState;

/// Security event log (target `security`)
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
