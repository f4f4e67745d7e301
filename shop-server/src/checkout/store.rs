//! Storage seam for order conversion
//!
//! A [`CheckoutStore`] opens one [`CheckoutTx`] per conversion. Everything done
//! through the transaction becomes visible together on [`CheckoutTx::commit`];
//! dropping the transaction without committing discards all of it.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{BasketItem, NewOrder, Order};
use thiserror::Error;

/// Product fields the conversion reads, taken under lock
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
}

/// A selected basket entry with the product it references (if it still exists)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedEntry {
    pub entry: BasketItem,
    pub product: Option<ProductSnapshot>,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Guarded stock write matched no row
    #[error("Stock changed concurrently for product {product_id}")]
    StockConflict { product_id: i64 },

    /// Injected or backend-specific failure
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opens atomic units of work
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn CheckoutTx>>;
}

/// One atomic unit of work
#[async_trait]
pub trait CheckoutTx: Send {
    /// Basket entries owned by `customer_id` among `entry_ids`, ordered by id,
    /// locked for the rest of the transaction
    async fn load_selection(
        &mut self,
        customer_id: i64,
        entry_ids: &[i64],
    ) -> StoreResult<Vec<SelectedEntry>>;

    /// Fails with [`StoreError::StockConflict`] rather than going negative
    async fn decrement_stock(&mut self, product_id: i64, quantity: i32) -> StoreResult<()>;

    /// Insert the order and its line items, returning them with assigned ids
    async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<Order>;

    async fn delete_basket_entries(&mut self, customer_id: i64, entry_ids: &[i64])
    -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
