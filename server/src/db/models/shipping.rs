//! Shipping Model
//!
//! Exactly one shipping record exists per order, created in the same
//! transaction as the order. The `order` and `address` references are never
//! altered after creation.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

/// Shipping status
///
/// The courier lifecycle is wider than the order lifecycle: in-transit,
/// out-for-delivery, cancelled and returned have no order counterpart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingStatus {
    Pending,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::Pending => "pending",
            ShippingStatus::Shipped => "shipped",
            ShippingStatus::InTransit => "in-transit",
            ShippingStatus::OutForDelivery => "out-for-delivery",
            ShippingStatus::Delivered => "delivered",
            ShippingStatus::Cancelled => "cancelled",
            ShippingStatus::Returned => "returned",
        }
    }
}

impl FromStr for ShippingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShippingStatus::Pending),
            "shipped" => Ok(ShippingStatus::Shipped),
            "in-transit" => Ok(ShippingStatus::InTransit),
            "out-for-delivery" => Ok(ShippingStatus::OutForDelivery),
            "delivered" => Ok(ShippingStatus::Delivered),
            "cancelled" => Ok(ShippingStatus::Cancelled),
            "returned" => Ok(ShippingStatus::Returned),
            other => Err(format!("unknown shipping status: {}", other)),
        }
    }
}

impl fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipping {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Immutable after creation
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Immutable after creation
    #[serde(with = "serde_helpers::record_id")]
    pub address: RecordId,
    pub status: ShippingStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Stamped on first transition into "shipped", then left alone
    #[serde(default)]
    pub shipped_at: Option<i64>,
    /// Stamped on first transition into "delivered", then left alone
    #[serde(default)]
    pub delivered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update accepted by the shipping-status entry point.
///
/// `order` and `address` are captured so their mere presence in a payload can
/// be rejected; `status` arrives as a raw string and is validated in the core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingUpdate {
    pub status: Option<String>,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<i64>,
    pub delivered_at: Option<i64>,
    pub order: Option<serde_json::Value>,
    pub address: Option<serde_json::Value>,
}
