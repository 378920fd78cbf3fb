//! Checkout Engine
//!
//! Converts a user's cart into a durable order. Everything that mutates state
//! runs in ONE SurrealDB transaction script: per-line stock check and
//! decrement, order creation, shipping creation, cart deletion. A `THROW`
//! anywhere in the script cancels the whole transaction, so a failed checkout
//! leaves no trace — no partial stock decrement is ever visible.
//!
//! The stock check re-reads each product inside the transaction (never from a
//! cache), so two checkouts racing for the same last unit are serialized by
//! the storage engine and the loser fails with `InsufficientStock`.

use super::error::CheckoutError;
use crate::db::models::{Cart, Order, OrderLine, OrderStatus, Shipping, ShippingStatus};
use crate::db::repository::{AddressRepository, CartRepository, RepoError};
use crate::utils::time::now_millis;
use rust_decimal::prelude::*;
use serde::Serialize;
use std::time::Duration;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

/// The two records a successful checkout produces
#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub shipping: Shipping,
}

/// Order content without the id field (record keys are generated client-side
/// so the shipping record can reference the order inside the same script)
#[derive(Debug, Serialize)]
struct OrderContent {
    owner: String,
    lines: Vec<OrderLine>,
    shipping_address: String,
    total_amount: f64,
    status: OrderStatus,
    paid: bool,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, Serialize)]
struct ShippingContent {
    order: String,
    address: String,
    status: ShippingStatus,
    tracking_number: Option<String>,
    shipped_at: Option<i64>,
    delivered_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

/// Place an order from the user's cart, shipping to the given address.
///
/// Fails with `AddressNotFound` when the address is missing OR owned by
/// someone else, `EmptyCart` when there is
/// nothing to order, `MissingProduct`/`InsufficientStock` when a cart line
/// cannot be satisfied, and `Timeout` when the transaction exceeds `timeout`.
pub async fn place_order(
    db: &Surreal<Db>,
    user: &RecordId,
    address_id: &str,
    timeout: Duration,
) -> Result<PlacedOrder, CheckoutError> {
    // Pre-reads for precise errors; every check is repeated authoritatively
    // inside the transaction below.
    let addresses = AddressRepository::new(db.clone());
    let address = addresses
        .find_owned(address_id, user)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) | RepoError::Validation(_) => {
                CheckoutError::AddressNotFound(address_id.to_string())
            }
            other => CheckoutError::Database(other.to_string()),
        })?;
    let address_id = address
        .id
        .ok_or_else(|| CheckoutError::Database("Loaded address without id".to_string()))?;

    let carts = CartRepository::new(db.clone());
    let cart = carts
        .find_by_owner(user)
        .await
        .map_err(|e| CheckoutError::Database(e.to_string()))?
        .ok_or(CheckoutError::EmptyCart)?;
    if cart.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let cart_id = cart
        .id
        .clone()
        .ok_or_else(|| CheckoutError::Database("Loaded cart without id".to_string()))?;

    let now = now_millis();
    let order_rid = RecordId::from_table_key("orders", uuid::Uuid::new_v4().simple().to_string());
    let shipping_rid =
        RecordId::from_table_key("shipping", uuid::Uuid::new_v4().simple().to_string());

    // Order lines freeze price_at_add; total_amount sums the frozen prices,
    // never the products' live prices.
    let lines: Vec<OrderLine> = cart
        .items
        .iter()
        .map(|item| OrderLine {
            product: item.product.clone(),
            quantity: item.quantity,
            price: item.price_at_add,
        })
        .collect();
    let total_amount = order_total(&cart);

    let order_content = OrderContent {
        owner: user.to_string(),
        lines,
        shipping_address: address_id.to_string(),
        total_amount,
        status: OrderStatus::Pending,
        paid: false,
        created_at: now,
        updated_at: now,
    };
    let shipping_content = ShippingContent {
        order: order_rid.to_string(),
        address: address_id.to_string(),
        status: ShippingStatus::Pending,
        tracking_number: None,
        shipped_at: None,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    };

    let script = build_script(&cart);
    let mut query = db.query(script);
    for (i, item) in cart.items.iter().enumerate() {
        query = query
            .bind((format!("pid{i}"), item.product.clone()))
            .bind((format!("qty{i}"), item.quantity));
    }
    query = query
        .bind(("now", now))
        .bind(("order_rid", order_rid))
        .bind(("order_content", order_content))
        .bind(("shipping_rid", shipping_rid))
        .bind(("shipping_content", shipping_content))
        .bind(("cart_rid", cart_id));

    let response = tokio::time::timeout(timeout, query)
        .await
        .map_err(|_| CheckoutError::Timeout)?;
    let mut response = response.map_err(|e| CheckoutError::Database(e.to_string()))?;

    // A THROW fails the transaction; all statement slots then carry errors,
    // one of which is the thrown sentinel.
    let errors = response.take_errors();
    if !errors.is_empty() {
        return Err(parse_transaction_errors(errors.values()));
    }

    let order_slot = 5 * cart.items.len();
    let order: Option<Order> = response
        .take(order_slot)
        .map_err(|e| CheckoutError::Database(e.to_string()))?;
    let shipping: Option<Shipping> = response
        .take(order_slot + 1)
        .map_err(|e| CheckoutError::Database(e.to_string()))?;

    match (order, shipping) {
        (Some(order), Some(shipping)) => {
            tracing::info!(
                order = %order.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                total = order.total_amount,
                lines = order.lines.len(),
                "order placed"
            );
            Ok(PlacedOrder { order, shipping })
        }
        _ => Err(CheckoutError::Database(
            "Checkout transaction committed without results".to_string(),
        )),
    }
}

/// Assemble the transaction script for a cart.
///
/// Per line item (5 statements each): fresh product read, existence check,
/// stock floor check, guarded decrement, decrement verification. The
/// decrement carries its own `WHERE stock_quantity >= $qty` floor, so an
/// oversell is impossible even if two transactions interleave between the
/// check and the write. Then order create, shipping create, cart delete.
/// Slot layout: the order record lands at index `5 * items`, the shipping
/// record right after it.
fn build_script(cart: &Cart) -> String {
    let mut script = String::from("BEGIN TRANSACTION;\n");

    for (i, item) in cart.items.iter().enumerate() {
        let product = item.product.to_string();
        script.push_str(&format!("LET $p{i} = (SELECT * FROM ONLY $pid{i});\n"));
        script.push_str(&format!(
            "IF $p{i} == NONE {{ THROW \"MISSING_PRODUCT|{product}\" }};\n"
        ));
        script.push_str(&format!(
            "IF $p{i}.stock_quantity < $qty{i} {{ THROW \"INSUFFICIENT_STOCK|{product}|{requested}|\" + <string>$p{i}.stock_quantity }};\n",
            requested = item.quantity,
        ));
        script.push_str(&format!(
            "LET $u{i} = (UPDATE $pid{i} SET stock_quantity -= $qty{i}, updated_at = $now WHERE stock_quantity >= $qty{i});\n"
        ));
        script.push_str(&format!(
            "IF array::len($u{i}) == 0 {{ THROW \"INSUFFICIENT_STOCK|{product}|{requested}|\" + <string>$p{i}.stock_quantity }};\n",
            requested = item.quantity,
        ));
    }

    script.push_str("CREATE ONLY $order_rid CONTENT $order_content;\n");
    script.push_str("CREATE ONLY $shipping_rid CONTENT $shipping_content;\n");
    script.push_str("DELETE $cart_rid;\n");
    script.push_str("COMMIT TRANSACTION;\n");
    script
}

/// Σ quantity × price_at_add, rounded to 2 decimal places
fn order_total(cart: &Cart) -> f64 {
    cart.items
        .iter()
        .map(|item| {
            Decimal::from_f64(item.price_at_add).unwrap_or_default()
                * Decimal::from(item.quantity)
        })
        .sum::<Decimal>()
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

/// Map the error set of a failed transaction back to a typed error.
///
/// SurrealDB reports the thrown sentinel on the failing statement and a
/// generic "transaction failed" error on every other slot, so all slots are
/// scanned for a sentinel before falling back to the first message.
fn parse_transaction_errors<'a, I>(errors: I) -> CheckoutError
where
    I: IntoIterator<Item = &'a surrealdb::Error>,
{
    let mut first = None;
    for err in errors {
        let msg = err.to_string();
        if let Some(parsed) = parse_sentinel(&msg) {
            return parsed;
        }
        first.get_or_insert(msg);
    }
    CheckoutError::Database(first.unwrap_or_else(|| "Transaction failed".to_string()))
}

fn parse_sentinel(msg: &str) -> Option<CheckoutError> {
    if let Some(pos) = msg.find("MISSING_PRODUCT|") {
        let rest = &msg[pos + "MISSING_PRODUCT|".len()..];
        let product = rest.split(|c: char| c.is_whitespace() || c == '"').next()?;
        return Some(CheckoutError::MissingProduct(product.to_string()));
    }
    if let Some(pos) = msg.find("INSUFFICIENT_STOCK|") {
        let rest = &msg[pos + "INSUFFICIENT_STOCK|".len()..];
        let token = rest.split(|c: char| c.is_whitespace() || c == '"').next()?;
        let mut parts = token.split('|');
        let product = parts.next()?.to_string();
        let requested: i64 = parts.next()?.parse().ok()?;
        let available: i64 = parts.next()?.parse().ok()?;
        return Some(CheckoutError::InsufficientStock {
            product,
            requested,
            available,
        });
    }
    None
}
