//! Manager back office (manager and admin roles)

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Order, OrderStatus, OrderStatusUpdate, Product, ProductCreate, ProductUpdate, Role,
    SalesReport, SalesReportQuery, User, UserUpdate,
};
use shared::util::DAY_MILLIS;

use super::orders::apply_transition;
use super::{ApiResult, found};
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ServiceError, on_unique_violation};
use crate::state::AppState;
use crate::util::{normalize_email, now_millis};

const CUSTOMER: &[Role] = &[Role::Customer];

/// Default report window
const REPORT_DAYS: i64 = 7;

// ── Customers ──

/// GET /api/manager/customers
pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(Json(db::users::list_by_roles(&state.pool, CUSTOMER).await?))
}

/// Apply a contact update to a user whose role is in `roles`
pub(crate) async fn update_user_scoped(
    state: &AppState,
    id: i64,
    roles: &[Role],
    mut req: UserUpdate,
) -> Result<User, ServiceError> {
    if let Some(email) = req.email.as_deref() {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email").into());
        }
        req.email = Some(email);
    }

    let user = db::users::update(&state.pool, id, roles, &req, now_millis())
        .await
        .map_err(|e| on_unique_violation(e, ErrorCode::EmailExists))?;
    found(user, || AppError::new(ErrorCode::UserNotFound))
}

/// PUT /api/manager/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UserUpdate>,
) -> ApiResult<User> {
    Ok(Json(update_user_scoped(&state, id, CUSTOMER, req).await?))
}

/// DELETE /api/manager/customers/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::users::delete(&state.pool, id, CUSTOMER).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }
    tracing::info!(customer_id = id, by = user.id, "Customer deleted");
    Ok(Json(true))
}

// ── Products ──

/// Largest value `products.price` (NUMERIC(12, 2)) can store
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn check_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO || price > max_price() {
        return Err(
            AppError::new(ErrorCode::ProductInvalidPrice).with_detail("price", price.to_string())
        );
    }
    Ok(())
}

fn check_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::new(ErrorCode::ProductInvalidStock).with_detail("stock", stock));
    }
    Ok(())
}

async fn check_category(state: &AppState, category_id: Option<i64>) -> Result<(), ServiceError> {
    if let Some(category_id) = category_id
        && !db::categories::exists(&state.pool, category_id).await?
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound)
            .with_detail("categoryId", category_id)
            .into());
    }
    Ok(())
}

/// POST /api/manager/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductCreate>,
) -> ApiResult<Product> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Product name is required").into());
    }
    check_price(req.price)?;
    check_stock(req.stock)?;
    check_category(&state, req.category_id).await?;

    let product = db::products::create(&state.pool, &req, now_millis()).await?;
    tracing::info!(product_id = product.id, "Product created");
    Ok(Json(product))
}

/// PUT /api/manager/products/{id}
///
/// Existing orders keep the price they were placed at.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Product name is required").into());
    }
    if let Some(price) = req.price {
        check_price(price)?;
    }
    if let Some(stock) = req.stock {
        check_stock(stock)?;
    }
    check_category(&state, req.category_id).await?;

    let product = db::products::update(&state.pool, id, &req, now_millis()).await?;
    Ok(Json(found(product, || AppError::new(ErrorCode::ProductNotFound))?))
}

/// DELETE /api/manager/products/{id}
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    if !db::products::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}

// ── Orders ──

/// GET /api/manager/orders
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    Ok(Json(db::orders::list_all(&state.pool).await?))
}

/// PUT /api/manager/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let next: OrderStatus = req.status.parse().map_err(|_| {
        AppError::new(ErrorCode::InvalidStatus).with_detail("status", req.status.clone())
    })?;
    let order = db::orders::find(&state.pool, id).await?;
    let order = found(order, || AppError::new(ErrorCode::OrderNotFound))?;

    Ok(Json(apply_transition(&state, &order, next).await?))
}

// ── Reports ──

/// Resolve the report window; missing bounds default to the last week
fn report_window(query: &SalesReportQuery, now: i64) -> Result<(i64, i64), AppError> {
    let end = query.end.unwrap_or(now);
    let start = query
        .start
        .unwrap_or_else(|| end.saturating_sub(REPORT_DAYS * DAY_MILLIS));
    if start > end {
        return Err(AppError::validation("start must not be after end"));
    }
    Ok((start, end))
}

/// GET /api/manager/reports/sales
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> ApiResult<SalesReport> {
    let (start, end) = report_window(&query, now_millis())?;
    Ok(Json(db::reports::sales_report(&state.pool, start, end).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_window_defaults_to_last_week() {
        let now = 100 * DAY_MILLIS;
        let (start, end) = report_window(&SalesReportQuery::default(), now).unwrap();
        assert_eq!(end, now);
        assert_eq!(start, now - 7 * DAY_MILLIS);
    }

    #[test]
    fn test_report_window_explicit_and_inverted() {
        let query = SalesReportQuery {
            start: Some(10),
            end: Some(20),
        };
        assert_eq!(report_window(&query, 0).unwrap(), (10, 20));

        let inverted = SalesReportQuery {
            start: Some(30),
            end: Some(20),
        };
        assert_eq!(
            report_window(&inverted, 0).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_report_window_extreme_end_saturates() {
        let query = SalesReportQuery {
            start: None,
            end: Some(i64::MIN),
        };
        assert_eq!(report_window(&query, 0).unwrap(), (i64::MIN, i64::MIN));

        let query = SalesReportQuery {
            start: None,
            end: Some(i64::MIN + DAY_MILLIS),
        };
        assert_eq!(
            report_window(&query, 0).unwrap(),
            (i64::MIN, i64::MIN + DAY_MILLIS)
        );
    }

    #[test]
    fn test_price_and_stock_checks() {
        assert!(check_price(Decimal::ZERO).is_ok());
        assert!(check_price(Decimal::new(999, 2)).is_ok());
        assert!(check_price(max_price()).is_ok());
        assert_eq!(
            check_price(Decimal::new(1_000_000_000_000, 2)).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert_eq!(
            check_price(Decimal::new(-1, 2)).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert!(check_stock(0).is_ok());
        assert_eq!(check_stock(-1).unwrap_err().code, ErrorCode::ProductInvalidStock);
    }
}
