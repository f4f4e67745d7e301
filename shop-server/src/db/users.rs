//! User account queries

use shared::models::{Role, User, UserUpdate};
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, phone, address, role, created_at";

fn role_names(roles: &[Role]) -> Vec<&'static str> {
    roles.iter().map(Role::as_str).collect()
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a user; a taken email surfaces as a unique violation
pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role: Role,
    now: i64,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO users (email, password_hash, full_name, role, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list_by_roles(pool: &PgPool, roles: &[Role]) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role::text = ANY($1) ORDER BY id"
    ))
    .bind(role_names(roles))
    .fetch_all(pool)
    .await
}

/// Update contact fields of a user whose role is in `roles`; `None` keeps the value
pub async fn update(
    pool: &PgPool,
    id: i64,
    roles: &[Role],
    data: &UserUpdate,
    now: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE users SET
            full_name = COALESCE($3, full_name),
            phone = COALESCE($4, phone),
            address = COALESCE($5, address),
            email = COALESCE($6, email),
            updated_at = $7
         WHERE id = $1 AND role::text = ANY($2)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(role_names(roles))
    .bind(&data.full_name)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.email)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn set_role(
    pool: &PgPool,
    id: i64,
    role: Role,
    now: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE users SET role = $2, updated_at = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(role)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Delete a user whose role is in `roles`. Returns whether a row went away.
pub async fn delete(pool: &PgPool, id: i64, roles: &[Role]) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM users WHERE id = $1 AND role::text = ANY($2)")
        .bind(id)
        .bind(role_names(roles))
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
