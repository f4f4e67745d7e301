//! Order Model
//!
//! Orders are immutable snapshots: line items carry the unit price captured
//! when the basket was converted and never follow later catalog changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// `pending → confirmed → shipped → delivered`, with `cancelled` reachable
/// from `pending` and `confirmed` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError(s.to_string())),
        }
    }
}

/// Order line item (price captured at conversion time)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_order: Decimal,
}

impl OrderItem {
    /// quantity × price_at_order, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.price_at_order.checked_mul(Decimal::from(self.quantity))
    }
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub delivery_method: Option<String>,
    pub delivery_address: Option<String>,
    pub total_amount: Decimal,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Optional delivery details supplied with a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub delivery_method: Option<String>,
    pub delivery_address: Option<String>,
}

/// Order ready to be inserted (no ids yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub status: OrderStatus,
    pub delivery: DeliveryInfo,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
}

/// Create-order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[serde(default)]
    pub basket_item_ids: Vec<i64>,
    pub delivery_method: Option<String>,
    pub delivery_address: Option<String>,
}

impl OrderCreate {
    pub fn delivery(&self) -> DeliveryInfo {
        DeliveryInfo {
            delivery_method: self.delivery_method.clone(),
            delivery_address: self.delivery_address.clone(),
        }
    }
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: 1,
            quantity: 3,
            price_at_order: Decimal::new(250, 2),
        };
        assert_eq!(item.line_total(), Some(Decimal::new(750, 2)));
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order {
            id: 9,
            customer_id: 4,
            status: OrderStatus::Pending,
            delivery_method: Some("courier".to_string()),
            delivery_address: None,
            total_amount: Decimal::new(500, 2),
            created_at: 1,
            updated_at: 1,
            items: vec![OrderItem {
                product_id: 2,
                quantity: 1,
                price_at_order: Decimal::new(500, 2),
            }],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerId"], 4);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["deliveryMethod"], "courier");
        assert_eq!(json["items"][0]["productId"], 2);
        assert_eq!(json["items"][0]["priceAtOrder"], 5.0);
    }

    #[test]
    fn test_order_create_defaults() {
        let req: OrderCreate = serde_json::from_str("{}").unwrap();
        assert!(req.basket_item_ids.is_empty());
        assert_eq!(req.delivery(), DeliveryInfo::default());
    }
}
