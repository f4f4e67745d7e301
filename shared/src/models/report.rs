//! Sales Report Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Report window, Unix millis. Missing bounds default to the last seven days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Product ranked by units sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    /// `None` once the product has been deleted
    pub name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period_start: i64,
    pub period_end: i64,
    /// Sum of order totals, cancelled orders excluded
    pub total_revenue: Decimal,
    pub order_count: i64,
    pub top_products: Vec<TopProduct>,
}
