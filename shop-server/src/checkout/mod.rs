//! Basket-to-order conversion
//!
//! [`CheckoutService::convert_basket_to_order`] turns a subset of a customer's
//! basket into a `pending` order inside one storage transaction:
//!
//! 1. load the selected entries (owner-scoped) with their products, locked
//! 2. validate every entry before touching anything
//! 3. decrement stock, insert the order with price snapshots, delete the
//!    converted basket entries
//! 4. commit
//!
//! Any error before the commit drops the transaction, which rolls back every
//! write made so far.

pub mod memory;
pub mod postgres;
pub mod store;

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{DeliveryInfo, NewOrder, Order, OrderItem, OrderStatus};
use thiserror::Error;
use tracing::Instrument;

use crate::util::now_millis;
pub use store::{CheckoutStore, CheckoutTx, ProductSnapshot, SelectedEntry, StoreError};

/// Conversion failures
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("No basket entries selected")]
    EmptySelection,

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    #[error("Product '{name}' is not available")]
    ProductUnavailable { product_id: i64, name: String },

    #[error("Not enough stock for '{name}': available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i32,
        requested: i64,
    },

    #[error("Order total exceeds {}", max_order_total())]
    TotalTooLarge,

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl CheckoutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptySelection => ErrorCode::OrderEmpty,
            Self::ProductNotFound { .. } => ErrorCode::ProductNotFound,
            Self::ProductUnavailable { .. } => ErrorCode::ProductUnavailable,
            Self::InsufficientStock { .. } => ErrorCode::ProductOutOfStock,
            Self::TotalTooLarge => ErrorCode::ValueOutOfRange,
            Self::Persistence(_) => ErrorCode::SystemBusy,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            CheckoutError::EmptySelection => AppError::new(code),
            CheckoutError::TotalTooLarge => AppError::with_message(code, message)
                .with_detail("maxTotal", max_order_total().to_string()),
            CheckoutError::ProductNotFound { product_id } => {
                AppError::with_message(code, format!("Product {product_id} not found"))
                    .with_detail("productId", product_id)
            }
            CheckoutError::ProductUnavailable { product_id, name } => {
                AppError::with_message(code, message)
                    .with_detail("productId", product_id)
                    .with_detail("name", name)
            }
            CheckoutError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            } => AppError::with_message(code, message)
                .with_detail("productId", product_id)
                .with_detail("available", available)
                .with_detail("requested", requested),
            // Detail stays in the log; clients only learn they may retry
            CheckoutError::Persistence(e) => {
                tracing::error!(error = %e, "Order conversion failed to persist");
                AppError::new(code)
            }
        }
    }
}

/// Largest total `orders.total_amount` (NUMERIC(24, 2)) can store
pub fn max_order_total() -> Decimal {
    Decimal::from_i128_with_scale(999_999_999_999_999_999_999_999, 2)
}

/// Validated conversion, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPlan {
    /// One line item per basket entry, in entry id order
    pub items: Vec<OrderItem>,
    /// Total quantity to take per product, ascending product id
    pub decrements: BTreeMap<i64, i32>,
    pub total_amount: Decimal,
    /// Basket entries consumed by the order
    pub entry_ids: Vec<i64>,
}

/// Sorted, deduplicated id list
pub fn normalize_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Validate a loaded selection without mutating anything.
///
/// Entries are checked in id order and the first failure wins. Stock is
/// compared against the summed quantity of every selected entry for the same
/// product.
pub fn plan_conversion(selection: &[SelectedEntry]) -> Result<ConversionPlan, CheckoutError> {
    if selection.is_empty() {
        return Err(CheckoutError::EmptySelection);
    }

    let mut ordered: Vec<&SelectedEntry> = selection.iter().collect();
    ordered.sort_by_key(|s| s.entry.id);

    let mut requested: BTreeMap<i64, i64> = BTreeMap::new();
    for selected in &ordered {
        *requested.entry(selected.entry.product_id).or_default() +=
            i64::from(selected.entry.quantity);
    }

    let mut items = Vec::with_capacity(ordered.len());
    let mut total_amount = Decimal::ZERO;
    for selected in &ordered {
        let entry = &selected.entry;
        let product = selected
            .product
            .as_ref()
            .ok_or(CheckoutError::ProductNotFound {
                product_id: entry.product_id,
            })?;

        if !product.is_active {
            return Err(CheckoutError::ProductUnavailable {
                product_id: product.id,
                name: product.name.clone(),
            });
        }

        let wanted = requested.get(&product.id).copied().unwrap_or_default();
        if i64::from(product.stock) < wanted {
            return Err(CheckoutError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock,
                requested: wanted,
            });
        }

        let item = OrderItem {
            product_id: product.id,
            quantity: entry.quantity,
            price_at_order: product.price,
        };
        total_amount = item
            .line_total()
            .and_then(|line| total_amount.checked_add(line))
            .filter(|total| *total <= max_order_total())
            .ok_or(CheckoutError::TotalTooLarge)?;
        items.push(item);
    }

    // Every sum passed the stock check above, so it fits in i32
    let decrements = requested
        .into_iter()
        .map(|(product_id, qty)| (product_id, i32::try_from(qty).unwrap_or(i32::MAX)))
        .collect();

    Ok(ConversionPlan {
        items,
        decrements,
        total_amount,
        entry_ids: ordered.iter().map(|s| s.entry.id).collect(),
    })
}

/// Order conversion engine
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn CheckoutStore>,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
        Self { store }
    }

    /// Convert the selected basket entries of `customer_id` into a pending order.
    ///
    /// Entries owned by other customers are ignored. Duplicate ids count once.
    /// Never retries: a [`CheckoutError::Persistence`] leaves state untouched and
    /// the caller may try again.
    pub async fn convert_basket_to_order(
        &self,
        customer_id: i64,
        entry_ids: &[i64],
        delivery: DeliveryInfo,
    ) -> Result<Order, CheckoutError> {
        let ids = normalize_ids(entry_ids);
        if ids.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }

        let span = tracing::info_span!("convert_basket", customer_id, entries = ids.len());
        let result = self.run(customer_id, &ids, delivery).instrument(span).await;
        match &result {
            Ok(order) => tracing::info!(
                customer_id,
                entries = ids.len(),
                order_id = order.id,
                total = %order.total_amount,
                "Basket converted to order"
            ),
            Err(CheckoutError::Persistence(_)) => {}
            Err(e) => tracing::info!(
                customer_id,
                entries = ids.len(),
                code = %e.code(),
                reason = %e,
                "Basket conversion rejected"
            ),
        }
        result
    }

    async fn run(
        &self,
        customer_id: i64,
        ids: &[i64],
        delivery: DeliveryInfo,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.store.begin().await?;

        let selection = tx.load_selection(customer_id, ids).await?;
        let plan = plan_conversion(&selection)?;

        for (&product_id, &quantity) in &plan.decrements {
            tx.decrement_stock(product_id, quantity).await?;
        }

        let now = now_millis();
        let new_order = NewOrder {
            customer_id,
            status: OrderStatus::Pending,
            delivery,
            total_amount: plan.total_amount,
            items: plan.items,
            created_at: now,
        };
        let order = tx.insert_order(&new_order).await?;

        tx.delete_basket_entries(customer_id, &plan.entry_ids)
            .await?;
        tx.commit().await?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::BasketItem;

    fn product(id: i64, price: Decimal, stock: i32, active: bool) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: format!("product-{id}"),
            price,
            stock,
            is_active: active,
        }
    }

    fn selected(id: i64, product_id: i64, qty: i32, p: Option<ProductSnapshot>) -> SelectedEntry {
        SelectedEntry {
            entry: BasketItem {
                id,
                customer_id: 1,
                product_id,
                quantity: qty,
                created_at: 0,
            },
            product: p,
        }
    }

    #[test]
    fn test_normalize_ids() {
        assert_eq!(normalize_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(normalize_ids(&[]).is_empty());
    }

    #[test]
    fn test_plan_empty_selection() {
        assert!(matches!(
            plan_conversion(&[]),
            Err(CheckoutError::EmptySelection)
        ));
    }

    #[test]
    fn test_plan_builds_items_and_total() {
        let a = product(10, Decimal::new(1000, 2), 5, true);
        let b = product(20, Decimal::new(250, 2), 1, true);
        let plan = plan_conversion(&[
            selected(2, 20, 1, Some(b)),
            selected(1, 10, 2, Some(a)),
        ])
        .unwrap();

        assert_eq!(plan.entry_ids, vec![1, 2]);
        assert_eq!(plan.items[0].product_id, 10);
        assert_eq!(plan.items[0].price_at_order, Decimal::new(1000, 2));
        assert_eq!(plan.items[1].product_id, 20);
        assert_eq!(plan.total_amount, Decimal::new(2250, 2));
        assert_eq!(plan.decrements.get(&10), Some(&2));
        assert_eq!(plan.decrements.get(&20), Some(&1));
    }

    #[test]
    fn test_plan_missing_product() {
        let err = plan_conversion(&[selected(1, 99, 1, None)]).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::ProductNotFound { product_id: 99 }
        ));
    }

    #[test]
    fn test_plan_inactive_product() {
        let p = product(5, Decimal::ONE, 10, false);
        let err = plan_conversion(&[selected(1, 5, 1, Some(p))]).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::ProductUnavailable { product_id: 5, .. }
        ));
    }

    #[test]
    fn test_plan_sums_quantities_per_product() {
        let p = product(7, Decimal::ONE, 4, true);
        let err = plan_conversion(&[
            selected(1, 7, 3, Some(p.clone())),
            selected(2, 7, 2, Some(p)),
        ])
        .unwrap_err();
        match err {
            CheckoutError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            } => {
                assert_eq!(product_id, 7);
                assert_eq!(available, 4);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plan_first_failure_in_id_order() {
        let inactive = product(1, Decimal::ONE, 10, false);
        let err = plan_conversion(&[selected(9, 2, 1, None), selected(3, 1, 1, Some(inactive))])
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable { .. }));
    }

    #[test]
    fn test_plan_rejects_total_beyond_column_range() {
        let price = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000, 2);
        let pricey = product(1, price, 100, true);
        let err = plan_conversion(&[selected(1, 1, 20, Some(pricey.clone()))]).unwrap_err();
        assert!(matches!(err, CheckoutError::TotalTooLarge));

        // Exactly at the limit still fits
        let at_limit = ProductSnapshot {
            price: max_order_total(),
            ..pricey
        };
        let plan = plan_conversion(&[selected(1, 1, 1, Some(at_limit))]).unwrap();
        assert_eq!(plan.total_amount, max_order_total());

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValueOutOfRange);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_mapping() {
        let app: AppError = CheckoutError::InsufficientStock {
            product_id: 3,
            name: "Mug".to_string(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(app.code, ErrorCode::ProductOutOfStock);
        let details = app.details.unwrap();
        assert_eq!(details.get("available").unwrap(), 1);
        assert_eq!(details.get("requested").unwrap(), 2);

        let app: AppError = CheckoutError::EmptySelection.into();
        assert_eq!(app.code, ErrorCode::OrderEmpty);

        let app: AppError =
            CheckoutError::Persistence(StoreError::Unavailable("disk on fire".into())).into();
        assert_eq!(app.code, ErrorCode::SystemBusy);
        assert!(!app.message.contains("disk"));
        assert!(app.details.is_none());
    }
}
