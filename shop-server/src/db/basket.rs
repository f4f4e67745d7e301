//! Basket queries

use shared::models::{BasketItem, BasketItemView, Product};
use sqlx::PgPool;

/// Append an entry. Repeated adds of the same product create separate entries.
pub async fn add(
    pool: &PgPool,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    now: i64,
) -> Result<BasketItem, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO basket_items (customer_id, product_id, quantity, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, customer_id, product_id, quantity, created_at",
    )
    .bind(customer_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(pool)
    .await
}

#[derive(sqlx::FromRow)]
struct BasketRow {
    entry_id: i64,
    entry_quantity: i32,
    #[sqlx(flatten)]
    product: Product,
}

/// Customer's entries with their current product
pub async fn list_for_customer(
    pool: &PgPool,
    customer_id: i64,
) -> Result<Vec<BasketItemView>, sqlx::Error> {
    let rows: Vec<BasketRow> = sqlx::query_as(
        "SELECT b.id AS entry_id, b.quantity AS entry_quantity,
                p.id, p.name, p.description, p.price, p.stock, p.is_active,
                p.category_id, p.image_path, p.created_at, p.updated_at
         FROM basket_items b
         JOIN products p ON p.id = b.product_id
         WHERE b.customer_id = $1
         ORDER BY b.id",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| BasketItemView {
            id: row.entry_id,
            product_id: row.product.id,
            quantity: row.entry_quantity,
            product: row.product,
        })
        .collect())
}

/// Owner-scoped delete. Returns whether a row went away.
pub async fn remove(pool: &PgPool, customer_id: i64, entry_id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM basket_items WHERE id = $1 AND customer_id = $2")
        .bind(entry_id)
        .bind(customer_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
