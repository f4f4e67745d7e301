//! HTTP routes for shop-server
//!
//! | Prefix | Access |
//! |--------|--------|
//! | `/health`, `/api/auth`, catalog reads | public |
//! | `/api/basket`, `/api/orders`, `/api/customer` | any signed-in user |
//! | category writes, `/api/manager` | manager, admin |
//! | `/api/admin` | admin |

pub mod admin;
pub mod auth;
pub mod basket;
pub mod categories;
pub mod health;
pub mod manager;
pub mod orders;
pub mod products;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router, middleware};
use shared::error::AppError;
use shared::models::Role;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, require_role};
use crate::error::ServiceError;
use crate::state::AppState;

pub(crate) type ApiResult<T> = Result<Json<T>, ServiceError>;

const STAFF: &[Role] = &[Role::Manager, Role::Admin];
const ADMIN: &[Role] = &[Role::Admin];

/// Shorthand for handlers that turn a missing row into a not-found error
pub(crate) fn found<T>(row: Option<T>, missing: impl FnOnce() -> AppError) -> Result<T, ServiceError> {
    row.ok_or_else(|| ServiceError::App(missing()))
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::get))
        .route("/api/categories", get(categories::list))
        .route("/api/categories/{id}", get(categories::get));

    let customer = Router::new()
        .route("/api/basket/add", post(basket::add))
        .route("/api/basket/items", get(basket::items))
        .route("/api/basket/items/{id}", delete(basket::remove))
        .route("/api/orders/create", post(orders::create))
        .route("/api/customer/orders", get(orders::list_own))
        .route("/api/customer/orders/{id}/cancel", post(orders::cancel));

    let staff = Router::new()
        .route("/api/categories", post(categories::create))
        .route(
            "/api/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/api/manager/customers", get(manager::list_customers))
        .route(
            "/api/manager/customers/{id}",
            put(manager::update_customer).delete(manager::delete_customer),
        )
        .route("/api/manager/products", post(manager::create_product))
        .route(
            "/api/manager/products/{id}",
            put(manager::update_product).delete(manager::delete_product),
        )
        .route("/api/manager/orders", get(manager::list_orders))
        .route(
            "/api/manager/orders/{id}/status",
            put(manager::update_order_status),
        )
        .route("/api/manager/reports/sales", get(manager::sales_report))
        .route_layer(middleware::from_fn(require_role(STAFF)));

    let admin = Router::new()
        .route(
            "/api/admin/staff",
            get(admin::list_staff).post(admin::create_staff),
        )
        .route(
            "/api/admin/staff/{id}",
            put(admin::update_staff).delete(admin::delete_staff),
        )
        .route("/api/admin/users/{id}/role", put(admin::set_role))
        .route(
            "/api/admin/profile",
            get(admin::get_profile).put(admin::update_profile),
        )
        .route_layer(middleware::from_fn(require_role(ADMIN)));

    // require_auth runs first, then the role gates
    let protected = customer
        .merge(staff)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
