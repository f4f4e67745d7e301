//! Sales reporting

use rust_decimal::Decimal;
use shared::models::{SalesReport, TopProduct};
use sqlx::PgPool;

const TOP_PRODUCTS: i64 = 10;

/// Revenue and best sellers for orders created in `[start, end]`
pub async fn sales_report(pool: &PgPool, start: i64, end: i64) -> Result<SalesReport, sqlx::Error> {
    let (total_revenue, order_count): (Option<Decimal>, i64) = sqlx::query_as(
        "SELECT SUM(total_amount), COUNT(*)
         FROM orders
         WHERE created_at BETWEEN $1 AND $2 AND status <> 'cancelled'",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let top_products: Vec<TopProduct> = sqlx::query_as(
        "SELECT oi.product_id, p.name, SUM(oi.quantity)::BIGINT AS quantity
         FROM order_items oi
         JOIN orders o ON o.id = oi.order_id
         LEFT JOIN products p ON p.id = oi.product_id
         WHERE o.created_at BETWEEN $1 AND $2 AND o.status <> 'cancelled'
         GROUP BY oi.product_id, p.name
         ORDER BY quantity DESC, oi.product_id
         LIMIT $3",
    )
    .bind(start)
    .bind(end)
    .bind(TOP_PRODUCTS)
    .fetch_all(pool)
    .await?;

    Ok(SalesReport {
        period_start: start,
        period_end: end,
        total_revenue: total_revenue.unwrap_or_default(),
        order_count,
        top_products,
    })
}
