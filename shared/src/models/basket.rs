//! Basket Model

use super::product::Product;
use serde::{Deserialize, Serialize};

/// A pending basket entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: i64,
}

/// Basket entry together with the product it points at
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItemView {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub product: Product,
}

/// Add-to-basket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketAdd {
    pub product_id: i64,
    pub quantity: i32,
}
