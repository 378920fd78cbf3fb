//! Order Repository
//!
//! Read-only access to orders. Orders are only ever created by the checkout
//! transaction and only ever mutated through the status-sync entry points.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Order;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Load an order only if it belongs to `owner`; NotFound otherwise
    pub async fn find_owned(&self, id: &str, owner: &RecordId) -> RepoResult<Order> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        match order {
            Some(order) if order.owner == *owner => Ok(order),
            _ => Err(RepoError::NotFound(format!("Order {} not found", id))),
        }
    }

    pub async fn find_by_owner(&self, owner: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }
}
