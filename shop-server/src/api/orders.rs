//! Customer order endpoints
//!
//! POST /api/orders/create                 convert selected basket entries
//! GET  /api/customer/orders               own orders, newest first
//! POST /api/customer/orders/{id}/cancel   cancel a pending/confirmed order

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatus};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::now_millis;

/// POST /api/orders/create
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OrderCreate>,
) -> ApiResult<Order> {
    let order = state
        .checkout
        .convert_basket_to_order(user.id, &req.basket_item_ids, req.delivery())
        .await
        .map_err(AppError::from)?;
    Ok(Json(order))
}

/// GET /api/customer/orders
pub async fn list_own(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Order>> {
    Ok(Json(db::orders::list_for_customer(&state.pool, user.id).await?))
}

/// Move `order` to `next` if the lifecycle allows it and nobody changed it meanwhile
pub(crate) async fn apply_transition(
    state: &AppState,
    order: &Order,
    next: OrderStatus,
) -> Result<Order, ServiceError> {
    let rejected = || {
        AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot move order from {} to {}", order.status, next),
        )
        .with_detail("from", order.status.as_str())
        .with_detail("to", next.as_str())
    };

    if !order.status.can_transition_to(next) {
        return Err(rejected().into());
    }
    let updated =
        db::orders::transition_status(&state.pool, order.id, order.status, next, now_millis())
            .await?;
    let updated = updated.ok_or_else(rejected)?;

    tracing::info!(
        order_id = updated.id,
        from = %order.status,
        to = %next,
        "Order status changed"
    );
    Ok(updated)
}

/// POST /api/customer/orders/{id}/cancel
///
/// Stock is not returned to the catalog.
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let order = db::orders::find(&state.pool, id)
        .await?
        .filter(|o| o.customer_id == user.id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    Ok(Json(apply_transition(&state, &order, OrderStatus::Cancelled).await?))
}
