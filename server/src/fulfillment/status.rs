//! Status mapping between Order and Shipping
//!
//! The single source of truth for cross-entity status implications, shared by
//! both sync directions so the two entry points cannot drift apart.
//!
//! The mapping is deliberately asymmetric: "paid" belongs to the payment
//! lifecycle and implies nothing for shipping; the courier-only statuses
//! (in-transit, out-for-delivery, cancelled, returned) imply nothing for the
//! order.

use crate::db::models::{OrderStatus, ShippingStatus};

/// Shipping status implied by an order status change, if any
pub fn implied_shipping_status(status: OrderStatus) -> Option<ShippingStatus> {
    match status {
        OrderStatus::Pending => Some(ShippingStatus::Pending),
        OrderStatus::Shipped => Some(ShippingStatus::Shipped),
        OrderStatus::Delivered => Some(ShippingStatus::Delivered),
        OrderStatus::Paid => None,
    }
}

/// Order status implied by a shipping status change, if any
pub fn implied_order_status(status: ShippingStatus) -> Option<OrderStatus> {
    match status {
        ShippingStatus::Shipped => Some(OrderStatus::Shipped),
        ShippingStatus::Delivered => Some(OrderStatus::Delivered),
        ShippingStatus::Pending
        | ShippingStatus::InTransit
        | ShippingStatus::OutForDelivery
        | ShippingStatus::Cancelled
        | ShippingStatus::Returned => None,
    }
}
