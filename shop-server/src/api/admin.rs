//! Admin console (admin role)

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, RoleUpdate, StaffCreate, User, UserUpdate};

use super::auth::{create_account, validate_account};
use super::manager::update_user_scoped;
use super::{ApiResult, found};
use crate::auth::CurrentUser;
use crate::db;
use crate::security_log;
use crate::state::AppState;
use crate::util::normalize_email;

const STAFF_ROLES: &[Role] = &[Role::Admin, Role::Manager];
const ALL_ROLES: &[Role] = &[Role::Customer, Role::Manager, Role::Admin];

fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidRole).with_detail("role", raw.to_string()))
}

/// GET /api/admin/staff
pub async fn list_staff(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(Json(db::users::list_by_roles(&state.pool, STAFF_ROLES).await?))
}

/// POST /api/admin/staff
pub async fn create_staff(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(req): Json<StaffCreate>,
) -> ApiResult<User> {
    let role = parse_role(&req.role)?;
    if !role.is_staff() {
        return Err(AppError::new(ErrorCode::InvalidRole)
            .with_detail("role", role.as_str())
            .into());
    }
    let email = normalize_email(&req.email);
    validate_account(&email, &req.password, &req.full_name)?;

    let user = create_account(&state, &email, &req.password, &req.full_name, role).await?;
    security_log!(
        "INFO",
        "staff_created",
        user_id = user.id,
        role = role.as_str(),
        by = admin.id
    );
    Ok(Json(user))
}

/// PUT /api/admin/staff/{id}
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UserUpdate>,
) -> ApiResult<User> {
    Ok(Json(update_user_scoped(&state, id, STAFF_ROLES, req).await?))
}

/// DELETE /api/admin/staff/{id}
pub async fn delete_staff(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if id == admin.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf).into());
    }
    if !db::users::delete(&state.pool, id, STAFF_ROLES).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }
    security_log!("INFO", "staff_deleted", user_id = id, by = admin.id);
    Ok(Json(true))
}

/// PUT /api/admin/users/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<RoleUpdate>,
) -> ApiResult<User> {
    let role = parse_role(&req.role)?;
    let user = db::users::set_role(&state.pool, id, role, crate::util::now_millis()).await?;
    let user = found(user, || AppError::new(ErrorCode::UserNotFound))?;

    security_log!(
        "INFO",
        "role_changed",
        user_id = id,
        role = role.as_str(),
        by = admin.id
    );
    Ok(Json(user))
}

/// GET /api/admin/profile
pub async fn get_profile(State(state): State<AppState>, admin: CurrentUser) -> ApiResult<User> {
    let user = db::users::find_by_id(&state.pool, admin.id).await?;
    Ok(Json(found(user, || AppError::new(ErrorCode::UserNotFound))?))
}

/// PUT /api/admin/profile
///
/// Only name and phone are editable here.
pub async fn update_profile(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(req): Json<UserUpdate>,
) -> ApiResult<User> {
    let req = UserUpdate {
        full_name: req.full_name,
        phone: req.phone,
        ..UserUpdate::default()
    };
    Ok(Json(update_user_scoped(&state, admin.id, ALL_ROLES, req).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("manager").unwrap(), Role::Manager);
        let err = parse_role("owner").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRole);
        assert_eq!(err.details.unwrap()["role"], "owner");
    }
}
