//! Basket endpoints (signed-in user's own basket)

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{BasketAdd, BasketItem, BasketItemView};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ServiceError, is_foreign_key_violation};
use crate::state::AppState;
use crate::util::now_millis;

/// POST /api/basket/add
///
/// Always appends a new entry; adding a product twice yields two entries.
/// Stock is not reserved here, only checked at order time.
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<BasketAdd>,
) -> ApiResult<BasketItem> {
    if req.quantity <= 0 {
        return Err(AppError::new(ErrorCode::BasketInvalidQuantity).into());
    }
    let product_missing = || {
        AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {} not found", req.product_id),
        )
        .with_detail("productId", req.product_id)
    };
    if db::products::find(&state.pool, req.product_id).await?.is_none() {
        return Err(product_missing().into());
    }

    // The product may vanish between the check and the insert
    let item = db::basket::add(
        &state.pool,
        user.id,
        req.product_id,
        req.quantity,
        now_millis(),
    )
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ServiceError::App(product_missing())
        } else {
            e.into()
        }
    })?;
    Ok(Json(item))
}

/// GET /api/basket/items
pub async fn items(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<BasketItemView>> {
    Ok(Json(db::basket::list_for_customer(&state.pool, user.id).await?))
}

/// DELETE /api/basket/items/{id}
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::basket::remove(&state.pool, user.id, id).await? {
        return Err(AppError::new(ErrorCode::BasketItemNotFound).into());
    }
    Ok(Json(true))
}
