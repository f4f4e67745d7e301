//! In-memory checkout store
//!
//! Holds catalog, basket and orders behind one async mutex. A transaction owns
//! the lock for its whole lifetime and writes into a working copy that replaces
//! the shared state only on commit, so conversions are fully serialized and an
//! abandoned transaction leaves no trace.
//!
//! Failure points can be armed to make a chosen step fail once, which lets
//! tests observe rollback behavior.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{BasketItem, NewOrder, Order, Product};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::store::{
    CheckoutStore, CheckoutTx, ProductSnapshot, SelectedEntry, StoreError, StoreResult,
};
use crate::util::now_millis;

/// Step at which an armed failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    DecrementStock,
    InsertOrder,
    DeleteBasket,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: BTreeMap<i64, Product>,
    basket: BTreeMap<i64, BasketItem>,
    orders: BTreeMap<i64, Order>,
    next_basket_id: i64,
    next_order_id: i64,
    fail_at: Option<FailPoint>,
}

impl MemoryState {
    /// Consume the armed failure if it matches `point`
    fn trip(&mut self, point: FailPoint) -> StoreResult<()> {
        if self.fail_at == Some(point) {
            self.fail_at = None;
            return Err(StoreError::Unavailable(format!("injected failure at {point:?}")));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryCheckoutStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCheckoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a catalog product
    pub async fn put_product(&self, product: Product) {
        self.state.lock().await.products.insert(product.id, product);
    }

    pub async fn product(&self, id: i64) -> Option<Product> {
        self.state.lock().await.products.get(&id).cloned()
    }

    pub async fn remove_product(&self, id: i64) {
        self.state.lock().await.products.remove(&id);
    }

    /// Add a basket entry; does not check the product
    pub async fn add_basket_entry(
        &self,
        customer_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> BasketItem {
        let mut state = self.state.lock().await;
        state.next_basket_id += 1;
        let item = BasketItem {
            id: state.next_basket_id,
            customer_id,
            product_id,
            quantity,
            created_at: now_millis(),
        };
        state.basket.insert(item.id, item.clone());
        item
    }

    pub async fn basket_of(&self, customer_id: i64) -> Vec<BasketItem> {
        self.state
            .lock()
            .await
            .basket
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect()
    }

    pub async fn orders_of(&self, customer_id: i64) -> Vec<Order> {
        self.state
            .lock()
            .await
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect()
    }

    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    /// Make the next transaction fail at `point` (once)
    pub async fn fail_at(&self, point: FailPoint) {
        self.state.lock().await.fail_at = Some(point);
    }
}

#[async_trait]
impl CheckoutStore for MemoryCheckoutStore {
    async fn begin(&self) -> StoreResult<Box<dyn CheckoutTx>> {
        let mut guard = self.state.clone().lock_owned().await;
        guard.trip(FailPoint::Begin)?;
        let working = guard.clone();
        Ok(Box::new(MemoryCheckoutTx { guard, working }))
    }
}

struct MemoryCheckoutTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryCheckoutTx {
    /// Failures are consumed on the shared state so they survive the rollback
    fn trip(&mut self, point: FailPoint) -> StoreResult<()> {
        let result = self.guard.trip(point);
        self.working.fail_at = self.guard.fail_at;
        result
    }
}

#[async_trait]
impl CheckoutTx for MemoryCheckoutTx {
    async fn load_selection(
        &mut self,
        customer_id: i64,
        entry_ids: &[i64],
    ) -> StoreResult<Vec<SelectedEntry>> {
        Ok(self
            .working
            .basket
            .values()
            .filter(|b| b.customer_id == customer_id && entry_ids.contains(&b.id))
            .map(|entry| SelectedEntry {
                entry: entry.clone(),
                product: self
                    .working
                    .products
                    .get(&entry.product_id)
                    .map(|p| ProductSnapshot {
                        id: p.id,
                        name: p.name.clone(),
                        price: p.price,
                        stock: p.stock,
                        is_active: p.is_active,
                    }),
            })
            .collect())
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i32) -> StoreResult<()> {
        self.trip(FailPoint::DecrementStock)?;
        let product = self
            .working
            .products
            .get_mut(&product_id)
            .filter(|p| p.stock >= quantity)
            .ok_or(StoreError::StockConflict { product_id })?;
        product.stock -= quantity;
        product.updated_at = now_millis();
        Ok(())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<Order> {
        self.trip(FailPoint::InsertOrder)?;
        self.working.next_order_id += 1;
        let saved = Order {
            id: self.working.next_order_id,
            customer_id: order.customer_id,
            status: order.status,
            delivery_method: order.delivery.delivery_method.clone(),
            delivery_address: order.delivery.delivery_address.clone(),
            total_amount: order.total_amount,
            created_at: order.created_at,
            updated_at: order.created_at,
            items: order.items.clone(),
        };
        self.working.orders.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_basket_entries(
        &mut self,
        customer_id: i64,
        entry_ids: &[i64],
    ) -> StoreResult<()> {
        self.trip(FailPoint::DeleteBasket)?;
        self.working
            .basket
            .retain(|id, b| !(b.customer_id == customer_id && entry_ids.contains(id)));
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.trip(FailPoint::Commit)?;
        let MemoryCheckoutTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
