//! Order/Shipping status synchronization
//!
//! Two entry points, symmetric in spirit: update the order and propagate to
//! shipping, or update the shipping record and propagate to the order. Each
//! runs as one SurrealDB transaction, so an observer never sees the order
//! moved without its shipping record (or vice versa) on a mapped transition.
//!
//! Concurrent conflicting updates resolve as last-write-wins at the storage
//! layer; there is no version token on these records.

use super::error::SyncError;
use super::status::{implied_order_status, implied_shipping_status};
use crate::db::models::{Order, OrderStatus, Shipping, ShippingStatus, ShippingUpdate};
use crate::db::repository::{RepoError, ShippingRepository, parse_record_id};
use crate::utils::time::now_millis;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Update an order's status, propagating the implied shipping status (if
/// any) within the same transaction.
///
/// Role guarding happens at the API boundary: only elevated callers reach
/// this function.
pub async fn update_order_status(
    db: &Surreal<Db>,
    order_id: &str,
    new_status: OrderStatus,
    timeout: Duration,
) -> Result<Order, SyncError> {
    let order_rid = parse_record_id("orders", order_id)
        .map_err(|_| SyncError::NotFound(format!("Order {}", order_id)))?;

    let mut script = String::from(
        "BEGIN TRANSACTION;\n\
         LET $before = (SELECT * FROM ONLY $order_rid);\n\
         IF $before == NONE { THROW \"NOT_FOUND|order\" };\n\
         UPDATE $order_rid SET status = $order_status, updated_at = $now;\n",
    );

    let implied = implied_shipping_status(new_status);
    if implied.is_some() {
        // First transition into shipped/delivered stamps the timestamp;
        // later passes leave it alone.
        script.push_str(
            "LET $ship = (SELECT * FROM ONLY shipping WHERE order = $order_str LIMIT 1);\n\
             IF $ship != NONE AND $ship.status != $ship_status {\n\
                 UPDATE $ship.id SET\n\
                     status = $ship_status,\n\
                     shipped_at = IF $ship_status == \"shipped\" AND $ship.shipped_at == NONE { $now } ELSE { $ship.shipped_at },\n\
                     delivered_at = IF $ship_status == \"delivered\" AND $ship.delivered_at == NONE { $now } ELSE { $ship.delivered_at },\n\
                     updated_at = $now;\n\
             };\n",
        );
    }
    script.push_str("COMMIT TRANSACTION;\n");

    let mut query = db
        .query(script)
        .bind(("order_rid", order_rid.clone()))
        .bind(("order_str", order_rid.to_string()))
        .bind(("order_status", new_status.as_str()))
        .bind(("now", now_millis()));
    if let Some(ship_status) = implied {
        query = query.bind(("ship_status", ship_status.as_str()));
    }

    let response = tokio::time::timeout(timeout, query)
        .await
        .map_err(|_| SyncError::Timeout)?;
    let mut response = response.map_err(|e| SyncError::Database(e.to_string()))?;

    let errors = response.take_errors();
    if !errors.is_empty() {
        return Err(parse_transaction_errors(errors.values()));
    }

    // Slot 2 is the order UPDATE (after the LET and the existence check)
    let orders: Vec<Order> = response
        .take(2)
        .map_err(|e| SyncError::Database(e.to_string()))?;
    orders
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::NotFound(format!("Order {}", order_id)))
}

/// Apply a partial update to a shipping record, propagating the implied
/// order status (if any) within the same transaction.
///
/// The `order` and `address` references are immutable: their mere presence in
/// the payload is rejected before any write. Unknown status strings are
/// rejected likewise.
pub async fn update_shipping_status(
    db: &Surreal<Db>,
    shipping_id: &str,
    updates: ShippingUpdate,
    timeout: Duration,
) -> Result<Shipping, SyncError> {
    // Validation happens before any write
    if updates.order.is_some() {
        return Err(SyncError::ImmutableField("order"));
    }
    if updates.address.is_some() {
        return Err(SyncError::ImmutableField("address"));
    }
    let new_status: Option<ShippingStatus> = match &updates.status {
        Some(raw) => Some(raw.parse().map_err(|_| SyncError::InvalidStatus(raw.clone()))?),
        None => None,
    };

    let shippings = ShippingRepository::new(db.clone());
    let before = shippings
        .find_by_id(shipping_id)
        .await
        .map_err(|e| match e {
            RepoError::Validation(_) => SyncError::NotFound(format!("Shipping {}", shipping_id)),
            other => SyncError::Database(other.to_string()),
        })?
        .ok_or_else(|| SyncError::NotFound(format!("Shipping {}", shipping_id)))?;
    let ship_rid = before
        .id
        .clone()
        .ok_or_else(|| SyncError::Database("Loaded shipping without id".to_string()))?;

    let now = now_millis();

    let mut set_parts: Vec<String> = vec!["updated_at = $now".to_string()];
    if new_status.is_some() {
        set_parts.push("status = $status".to_string());
    }
    if updates.tracking_number.is_some() {
        set_parts.push("tracking_number = $tracking_number".to_string());
    }
    match (updates.shipped_at, new_status) {
        (Some(_), _) => set_parts.push("shipped_at = $shipped_at".to_string()),
        (None, Some(ShippingStatus::Shipped)) => {
            // Auto-stamp on first transition only
            set_parts.push(
                "shipped_at = IF $before.shipped_at == NONE { $now } ELSE { $before.shipped_at }"
                    .to_string(),
            );
        }
        _ => {}
    }
    match (updates.delivered_at, new_status) {
        (Some(_), _) => set_parts.push("delivered_at = $delivered_at".to_string()),
        (None, Some(ShippingStatus::Delivered)) => {
            set_parts.push(
                "delivered_at = IF $before.delivered_at == NONE { $now } ELSE { $before.delivered_at }"
                    .to_string(),
            );
        }
        _ => {}
    }

    let mut script = format!(
        "BEGIN TRANSACTION;\n\
         LET $before = (SELECT * FROM ONLY $ship_rid);\n\
         IF $before == NONE {{ THROW \"NOT_FOUND|shipping\" }};\n\
         UPDATE $ship_rid SET {};\n",
        set_parts.join(", ")
    );

    let implied = new_status.and_then(implied_order_status);
    if implied.is_some() {
        script.push_str(
            "LET $ord = (SELECT * FROM ONLY $order_rid);\n\
             IF $ord != NONE AND $ord.status != $order_status {\n\
                 UPDATE $order_rid SET status = $order_status, updated_at = $now;\n\
             };\n",
        );
    }
    script.push_str("COMMIT TRANSACTION;\n");

    let mut query = db
        .query(script)
        .bind(("ship_rid", ship_rid))
        .bind(("now", now));
    if let Some(status) = new_status {
        query = query.bind(("status", status.as_str()));
    }
    if let Some(tracking) = updates.tracking_number {
        query = query.bind(("tracking_number", tracking));
    }
    if let Some(shipped_at) = updates.shipped_at {
        query = query.bind(("shipped_at", shipped_at));
    }
    if let Some(delivered_at) = updates.delivered_at {
        query = query.bind(("delivered_at", delivered_at));
    }
    if let Some(order_status) = implied {
        query = query
            .bind(("order_rid", before.order.clone()))
            .bind(("order_status", order_status.as_str()));
    }

    let mut response = tokio::time::timeout(timeout, query)
        .await
        .map_err(|_| SyncError::Timeout)?
        .map_err(|e| SyncError::Database(e.to_string()))?;

    let errors = response.take_errors();
    if !errors.is_empty() {
        return Err(parse_transaction_errors(errors.values()));
    }

    // Slot 2 is the shipping UPDATE
    let records: Vec<Shipping> = response
        .take(2)
        .map_err(|e| SyncError::Database(e.to_string()))?;
    records
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::NotFound(format!("Shipping {}", shipping_id)))
}

/// Scan all failed-transaction slots for the NOT_FOUND sentinel
fn parse_transaction_errors<'a, I>(errors: I) -> SyncError
where
    I: IntoIterator<Item = &'a surrealdb::Error>,
{
    let mut first = None;
    for err in errors {
        let msg = err.to_string();
        if msg.contains("NOT_FOUND|order") {
            return SyncError::NotFound("Order".to_string());
        }
        if msg.contains("NOT_FOUND|shipping") {
            return SyncError::NotFound("Shipping".to_string());
        }
        first.get_or_insert(msg);
    }
    SyncError::Database(first.unwrap_or_else(|| "Transaction failed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immutable_field_sentinels() {
        // Pure validation errors carry the field name
        assert_eq!(
            SyncError::ImmutableField("order").to_string(),
            "Field 'order' is immutable after creation"
        );
    }

    #[test]
    fn not_found_sentinel_parsing() {
        let err = surrealdb::Error::Api(surrealdb::error::Api::Query(
            "An error occurred: NOT_FOUND|order".to_string(),
        ));
        match parse_transaction_errors([&err]) {
            SyncError::NotFound(what) => assert_eq!(what, "Order"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
