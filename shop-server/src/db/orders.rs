//! Order queries
//!
//! Orders are created only by the checkout engine; this module reads them and
//! moves them through the status lifecycle.

use std::collections::HashMap;

use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::PgPool;

const ORDER_COLUMNS: &str = "id, customer_id, status, delivery_method, delivery_address, \
                             total_amount, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: i64,
    #[sqlx(flatten)]
    item: OrderItem,
}

/// Fill `items` for each order, in line position order
async fn attach_items(pool: &PgPool, orders: &mut [Order]) -> Result<(), sqlx::Error> {
    if orders.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let rows: Vec<ItemRow> = sqlx::query_as(
        "SELECT order_id, product_id, quantity, price_at_order
         FROM order_items
         WHERE order_id = ANY($1)
         ORDER BY order_id, position",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row.item);
    }
    for order in orders.iter_mut() {
        order.items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

/// Customer's orders, newest first
pub async fn list_for_customer(pool: &PgPool, customer_id: i64) -> Result<Vec<Order>, sqlx::Error> {
    let mut orders: Vec<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    attach_items(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
    let mut orders: Vec<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    attach_items(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match order {
        Some(order) => {
            let mut orders = [order];
            attach_items(pool, &mut orders).await?;
            let [order] = orders;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// Compare-and-set status change.
///
/// Only applies when the row still has status `from`, so two concurrent
/// transitions cannot both succeed. Returns `None` if the row moved on.
pub async fn transition_status(
    pool: &PgPool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    now: i64,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(&format!(
        "UPDATE orders SET status = $3, updated_at = $4
         WHERE id = $1 AND status = $2
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(from)
    .bind(to)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    match order {
        Some(order) => {
            let mut orders = [order];
            attach_items(pool, &mut orders).await?;
            let [order] = orders;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}
