//! Account registration and login
//!
//! POST /api/auth/register  create a customer account, returns a token
//! POST /api/auth/login     exchange credentials for a token

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User};

use super::ApiResult;
use crate::db;
use crate::error::{ServiceError, on_unique_violation};
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_password, normalize_email, now_millis, verify_password};

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Shared account field checks for self-registration and staff creation
pub(crate) fn validate_account(email: &str, password: &str, full_name: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if full_name.trim().is_empty() {
        return Err(AppError::validation("Full name is required"));
    }
    Ok(())
}

/// Hash the password and insert the account, mapping a taken email to `EmailExists`
pub(crate) async fn create_account(
    state: &AppState,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<User, ServiceError> {
    let password_hash = hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "Password hash error");
        AppError::new(ErrorCode::InternalError)
    })?;

    db::users::create(
        &state.pool,
        email,
        &password_hash,
        full_name.trim(),
        role,
        now_millis(),
    )
    .await
    .map_err(|e| on_unique_violation(e, ErrorCode::EmailExists))
}

fn issue_token(state: &AppState, user: &User) -> Result<AuthResponse, ServiceError> {
    let token = state
        .jwt
        .generate_token(user.id, &user.email, user.role)
        .map_err(|e| {
            tracing::error!(error = %e, "JWT creation failed");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(AuthResponse {
        token,
        role: user.role,
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&req.email);
    validate_account(&email, &req.password, &req.full_name)?;

    let user = create_account(&state, &email, &req.password, &req.full_name, Role::Customer).await?;
    tracing::info!(user_id = user.id, "Customer registered");

    Ok(Json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&req.email);
    let user = db::users::find_by_email(&state.pool, &email).await?;

    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        security_log!("WARN", "login_failed", email = email);
        return Err(AppError::invalid_credentials().into());
    };

    Ok(Json(issue_token(&state, &user)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_account() {
        assert!(validate_account("ann@example.com", "longenough", "Ann").is_ok());

        let err = validate_account("ann@example.com", "short", "Ann").unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);

        let err = validate_account("not-an-email", "longenough", "Ann").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = validate_account("ann@example.com", "longenough", "  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
