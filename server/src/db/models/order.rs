//! Order Model
//!
//! Orders are created atomically from a cart by the checkout engine and are
//! never created any other way. `total_amount` is fixed at creation; after
//! that, status (and the paid flag via the payment flow) are the only
//! permitted mutations.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

/// Order status
///
/// "paid" belongs to the payment lifecycle and deliberately has no shipping
/// counterpart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Paid => "paid",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "paid" => Ok(OrderStatus::Paid),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One order line; `price` is the frozen price-at-add-to-cart copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub lines: Vec<OrderLine>,
    #[serde(with = "serde_helpers::record_id")]
    pub shipping_address: RecordId,
    /// Σ quantity × price across all lines, immutable after creation
    pub total_amount: f64,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update accepted by the order-status entry point
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    /// Status as a raw string, validated against the enum in the core
    pub status: String,
}
