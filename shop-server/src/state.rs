//! Application state

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{JwtConfig, JwtService};
use crate::checkout::CheckoutService;
use crate::checkout::postgres::PgCheckoutStore;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Token issue/validation
    pub jwt: JwtService,
    /// Basket-to-order conversion
    pub checkout: CheckoutService,
}

impl AppState {
    /// Connect, migrate, and wire services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_millis(config.db_acquire_timeout_ms))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::from_parts(pool, JwtService::with_config(JwtConfig::from(config))))
    }

    pub fn from_parts(pool: PgPool, jwt: JwtService) -> Self {
        let checkout = CheckoutService::new(Arc::new(PgCheckoutStore::new(pool.clone())));
        Self {
            pool,
            jwt,
            checkout,
        }
    }
}
