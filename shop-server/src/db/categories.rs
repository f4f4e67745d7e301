//! Category queries

use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::PgPool;

const CATEGORY_COLUMNS: &str = "id, name, description, parent_id, created_at, updated_at";

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &CategoryCreate,
    now: i64,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO categories (name, description, parent_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4)
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.parent_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update; `parent_id: Some(None)` detaches the category to the root
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
    now: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE categories SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            parent_id = CASE WHEN $4 THEN $5 ELSE parent_id END,
            updated_at = $6
         WHERE id = $1
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.parent_id.is_some())
    .bind(data.parent_id.flatten())
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Whether `id` is an ancestor of (or equal to) `descendant`
pub async fn is_ancestor(pool: &PgPool, id: i64, descendant: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "WITH RECURSIVE chain AS (
            SELECT id, parent_id FROM categories WHERE id = $2
            UNION
            SELECT c.id, c.parent_id FROM categories c JOIN chain ON c.id = chain.parent_id
         )
         SELECT EXISTS(SELECT 1 FROM chain WHERE id = $1)",
    )
    .bind(id)
    .bind(descendant)
    .fetch_one(pool)
    .await
}

/// Has subcategories or products
pub async fn in_use(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)
             OR EXISTS(SELECT 1 FROM products WHERE category_id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
