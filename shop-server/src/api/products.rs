//! Public catalog

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductQuery};

use super::{ApiResult, found};
use crate::db;
use crate::state::AppState;

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<Product>> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price)
        && min > max
    {
        return Err(AppError::validation("minPrice must not exceed maxPrice").into());
    }
    Ok(Json(db::products::list(&state.pool, &query).await?))
}

/// GET /api/products/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    let product = db::products::find(&state.pool, id).await?;
    Ok(Json(found(product, || AppError::new(ErrorCode::ProductNotFound))?))
}
