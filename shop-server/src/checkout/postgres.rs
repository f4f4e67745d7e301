//! PostgreSQL checkout store
//!
//! Row locks are taken basket rows first, then product rows in ascending id
//! order, so two conversions touching the same products always lock them in
//! the same sequence.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{BasketItem, NewOrder, Order};
use sqlx::{PgPool, Postgres, Transaction};

use super::store::{
    CheckoutStore, CheckoutTx, ProductSnapshot, SelectedEntry, StoreError, StoreResult,
};
use crate::util::now_millis;

#[derive(Clone)]
pub struct PgCheckoutStore {
    pool: PgPool,
}

impl PgCheckoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn begin(&self) -> StoreResult<Box<dyn CheckoutTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCheckoutTx { tx }))
    }
}

/// Dropping without `commit` rolls the transaction back
struct PgCheckoutTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CheckoutTx for PgCheckoutTx {
    async fn load_selection(
        &mut self,
        customer_id: i64,
        entry_ids: &[i64],
    ) -> StoreResult<Vec<SelectedEntry>> {
        let entries: Vec<BasketItem> = sqlx::query_as(
            "SELECT id, customer_id, product_id, quantity, created_at
             FROM basket_items
             WHERE customer_id = $1 AND id = ANY($2)
             ORDER BY id
             FOR UPDATE",
        )
        .bind(customer_id)
        .bind(entry_ids)
        .fetch_all(&mut *self.tx)
        .await?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut product_ids: Vec<i64> = entries.iter().map(|e| e.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products: Vec<ProductSnapshot> = sqlx::query_as(
            "SELECT id, name, price, stock, is_active
             FROM products
             WHERE id = ANY($1)
             ORDER BY id
             FOR UPDATE",
        )
        .bind(&product_ids)
        .fetch_all(&mut *self.tx)
        .await?;

        let by_id: HashMap<i64, ProductSnapshot> =
            products.into_iter().map(|p| (p.id, p)).collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let product = by_id.get(&entry.product_id).cloned();
                SelectedEntry { entry, product }
            })
            .collect())
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i32) -> StoreResult<()> {
        let rows = sqlx::query(
            "UPDATE products SET stock = stock - $2, updated_at = $3
             WHERE id = $1 AND stock >= $2",
        )
        .bind(product_id)
        .bind(quantity)
        .bind(now_millis())
        .execute(&mut *self.tx)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(StoreError::StockConflict { product_id });
        }
        Ok(())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<Order> {
        let mut saved: Order = sqlx::query_as(
            "INSERT INTO orders
                (customer_id, status, delivery_method, delivery_address, total_amount, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, customer_id, status, delivery_method, delivery_address, total_amount, created_at, updated_at",
        )
        .bind(order.customer_id)
        .bind(order.status)
        .bind(&order.delivery.delivery_method)
        .bind(&order.delivery.delivery_address)
        .bind(order.total_amount)
        .bind(order.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items (order_id, position, product_id, quantity, price_at_order)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(saved.id)
            .bind(position as i32)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price_at_order)
            .execute(&mut *self.tx)
            .await?;
        }

        saved.items = order.items.clone();
        Ok(saved)
    }

    async fn delete_basket_entries(
        &mut self,
        customer_id: i64,
        entry_ids: &[i64],
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM basket_items WHERE customer_id = $1 AND id = ANY($2)")
            .bind(customer_id)
            .bind(entry_ids)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
