//! Shipping Repository
//!
//! Read-only access to shipping records. Creation happens inside the
//! checkout transaction; status mutations go through the status-sync entry
//! points.

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Shipping;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SHIPPING_TABLE: &str = "shipping";

#[derive(Clone)]
pub struct ShippingRepository {
    base: BaseRepository,
}

impl ShippingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Shipping>> {
        let rid = parse_record_id(SHIPPING_TABLE, id)?;
        let shipping: Option<Shipping> = self.base.db().select(rid).await?;
        Ok(shipping)
    }

    /// The 1:1 companion record of an order
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Option<Shipping>> {
        let order = parse_record_id("orders", order_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shipping WHERE order = $order LIMIT 1")
            .bind(("order", order.to_string()))
            .await?;
        let records: Vec<Shipping> = result.take(0)?;
        Ok(records.into_iter().next())
    }
}
