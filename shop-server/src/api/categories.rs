//! Category tree
//!
//! Reads are public; writes need a manager or admin.

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use super::{ApiResult, found};
use crate::db;
use crate::error::{ServiceError, on_foreign_key_violation};
use crate::state::AppState;
use crate::util::now_millis;

fn category_not_found() -> AppError {
    AppError::new(ErrorCode::CategoryNotFound)
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(Json(db::categories::list(&state.pool).await?))
}

/// GET /api/categories/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Category> {
    let category = db::categories::find(&state.pool, id).await?;
    Ok(Json(found(category, category_not_found)?))
}

async fn check_parent(state: &AppState, parent_id: i64) -> Result<(), ServiceError> {
    if !db::categories::exists(&state.pool, parent_id).await? {
        return Err(AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Parent category {parent_id} not found"),
        )
        .into());
    }
    Ok(())
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CategoryCreate>,
) -> ApiResult<Category> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required").into());
    }
    if let Some(parent_id) = req.parent_id {
        check_parent(&state, parent_id).await?;
    }
    // The parent may vanish between the check and the insert
    let category = db::categories::create(&state.pool, &req, now_millis())
        .await
        .map_err(|e| on_foreign_key_violation(e, ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Category name is required").into());
    }
    if let Some(Some(parent_id)) = req.parent_id {
        // Also rejects self-parenting: a category is its own ancestor
        if db::categories::is_ancestor(&state.pool, id, parent_id).await? {
            return Err(AppError::new(ErrorCode::CategoryInvalidParent).into());
        }
        check_parent(&state, parent_id).await?;
    }
    let category = db::categories::update(&state.pool, id, &req, now_millis())
        .await
        .map_err(|e| on_foreign_key_violation(e, ErrorCode::CategoryNotFound))?;
    Ok(Json(found(category, category_not_found)?))
}

/// DELETE /api/categories/{id}
pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    if !db::categories::exists(&state.pool, id).await? {
        return Err(category_not_found().into());
    }
    if db::categories::in_use(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::CategoryInUse).into());
    }
    // A child or product added after the check still blocks the delete
    let deleted = db::categories::delete(&state.pool, id)
        .await
        .map_err(|e| on_foreign_key_violation(e, ErrorCode::CategoryInUse))?;
    Ok(Json(deleted))
}
