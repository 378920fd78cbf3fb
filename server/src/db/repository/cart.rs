//! Cart Repository
//!
//! One live cart per user, enforced by the unique owner index. The retention
//! window is applied lazily: an expired cart is purged on access and treated
//! as absent, so callers never observe a stale price snapshot.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Cart, CartItem};
use crate::utils::time::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the user's live cart, purging it first if the TTL has lapsed
    pub async fn find_by_owner(&self, owner: &RecordId) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE owner = $owner LIMIT 1")
            .bind(("owner", owner.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        let Some(cart) = carts.into_iter().next() else {
            return Ok(None);
        };

        if cart.is_expired(now_millis()) {
            if let Some(id) = &cart.id {
                let _: Option<Cart> = self.base.db().delete(id.clone()).await?;
            }
            return Ok(None);
        }

        Ok(Some(cart))
    }

    /// Add a line item, creating the cart lazily on first add.
    ///
    /// `price_at_add` is the product's current price, frozen from here on.
    pub async fn add_item(
        &self,
        owner: &RecordId,
        product: RecordId,
        quantity: i64,
        price_at_add: f64,
    ) -> RepoResult<Cart> {
        if quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }

        let now = now_millis();
        let mut cart = match self.find_by_owner(owner).await? {
            Some(cart) => cart,
            None => Cart::new(owner.clone(), now),
        };

        // Same product twice merges into one line, keeping the original
        // locked price
        match cart.items.iter_mut().find(|i| i.product == product) {
            Some(line) => line.quantity += quantity,
            None => cart.items.push(CartItem {
                product,
                quantity,
                price_at_add,
            }),
        }
        cart.touch(now);

        self.save(cart).await
    }

    /// Set the quantity of an existing line item
    pub async fn update_item(
        &self,
        owner: &RecordId,
        product_id: &str,
        quantity: i64,
    ) -> RepoResult<Cart> {
        if quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }
        let product = parse_record_id("product", product_id)?;

        let mut cart = self
            .find_by_owner(owner)
            .await?
            .ok_or_else(|| RepoError::NotFound("Cart not found".to_string()))?;

        let line = cart
            .items
            .iter_mut()
            .find(|i| i.product == product)
            .ok_or_else(|| RepoError::NotFound(format!("Item {} not in cart", product_id)))?;
        line.quantity = quantity;
        cart.touch(now_millis());

        self.save(cart).await
    }

    /// Remove a line item; removing the last one leaves an empty cart record
    pub async fn remove_item(&self, owner: &RecordId, product_id: &str) -> RepoResult<Cart> {
        let product = parse_record_id("product", product_id)?;

        let mut cart = self
            .find_by_owner(owner)
            .await?
            .ok_or_else(|| RepoError::NotFound("Cart not found".to_string()))?;

        let before = cart.items.len();
        cart.items.retain(|i| i.product != product);
        if cart.items.len() == before {
            return Err(RepoError::NotFound(format!("Item {} not in cart", product_id)));
        }
        cart.touch(now_millis());

        self.save(cart).await
    }

    /// Destroy the user's cart outright (checkout does this transactionally;
    /// this path serves the explicit clear operation)
    pub async fn delete_by_owner(&self, owner: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart WHERE owner = $owner")
            .bind(("owner", owner.to_string()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }

    async fn save(&self, mut cart: Cart) -> RepoResult<Cart> {
        match cart.id.take() {
            Some(id) => {
                let updated: Option<Cart> =
                    self.base.db().update(id).content(cart).await?;
                updated.ok_or_else(|| RepoError::Database("Failed to update cart".to_string()))
            }
            None => {
                let created: Option<Cart> =
                    self.base.db().create(CART_TABLE).content(cart).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
            }
        }
    }
}
