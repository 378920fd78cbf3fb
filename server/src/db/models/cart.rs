//! Cart Model
//!
//! One live cart per user (unique owner index). Line items snapshot the
//! product price at add-to-cart time; derived totals are recomputed on every
//! mutation. Carts expire after a fixed retention window when untouched and
//! are destroyed outright by a successful checkout.

use super::serde_helpers;
use crate::utils::time::CART_TTL_MILLIS;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One product+quantity+locked-price entry within a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i64,
    /// Price frozen when the item was added, not the live product price
    pub price_at_add: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_quantity: i64,
    pub total_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Untouched carts past this instant are treated as absent
    pub expires_at: i64,
}

impl Cart {
    pub fn new(owner: RecordId, now: i64) -> Self {
        Self {
            id: None,
            owner,
            items: Vec::new(),
            total_quantity: 0,
            total_price: 0.0,
            created_at: now,
            updated_at: now,
            expires_at: now + CART_TTL_MILLIS,
        }
    }

    /// Recompute derived totals and refresh the retention window
    pub fn touch(&mut self, now: i64) {
        self.total_quantity = self.items.iter().map(|i| i.quantity).sum();
        self.total_price = self
            .items
            .iter()
            .map(|i| {
                Decimal::from_f64(i.price_at_add).unwrap_or_default()
                    * Decimal::from(i.quantity)
            })
            .sum::<Decimal>()
            .round_dp(2)
            .to_f64()
            .unwrap_or(0.0);
        self.updated_at = now;
        self.expires_at = now + CART_TTL_MILLIS;
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItemAdd {
    /// "product:..." record id
    pub product: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, quantity: i64, price: f64) -> CartItem {
        CartItem {
            product: RecordId::from_table_key("product", key),
            quantity,
            price_at_add: price,
        }
    }

    #[test]
    fn totals_recomputed_on_touch() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"), 1_000);
        cart.items.push(item("a", 2, 100.0));
        cart.items.push(item("b", 3, 9.99));
        cart.touch(2_000);

        assert_eq!(cart.total_quantity, 5);
        assert_eq!(cart.total_price, 229.97);
        assert_eq!(cart.updated_at, 2_000);
        assert_eq!(cart.expires_at, 2_000 + CART_TTL_MILLIS);
    }

    #[test]
    fn expiry_follows_last_mutation() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"), 0);
        assert!(!cart.is_expired(CART_TTL_MILLIS - 1));
        assert!(cart.is_expired(CART_TTL_MILLIS));

        cart.touch(CART_TTL_MILLIS);
        assert!(!cart.is_expired(CART_TTL_MILLIS + 1));
    }
}
