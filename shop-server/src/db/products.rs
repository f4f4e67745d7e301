//! Product catalog queries

use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate};
use sqlx::{PgPool, Postgres, QueryBuilder};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, is_active, category_id, \
                               image_path, created_at, updated_at";

/// Filtered, sorted catalog listing
pub async fn list(pool: &PgPool, query: &ProductQuery) -> Result<Vec<Product>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

    if let Some(min) = query.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(category_id) = query.category_id {
        qb.push(" AND category_id = ").push_bind(category_id);
    }
    if query.in_stock == Some(true) {
        qb.push(" AND stock > 0");
    }
    qb.push(" ORDER BY ")
        .push(query.sort_by.unwrap_or_default().order_by());

    let products = qb.build_query_as().fetch_all(pool).await?;
    Ok(products)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, data: &ProductCreate, now: i64) -> Result<Product, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO products
            (name, description, price, stock, is_active, category_id, image_path, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.category_id)
    .bind(&data.image_path)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update; changing the price never touches existing orders
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
    now: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE products SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            stock = COALESCE($5, stock),
            is_active = COALESCE($6, is_active),
            category_id = COALESCE($7, category_id),
            image_path = COALESCE($8, image_path),
            updated_at = $9
         WHERE id = $1
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.is_active)
    .bind(data.category_id)
    .bind(&data.image_path)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Basket entries referencing the product go with it
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
