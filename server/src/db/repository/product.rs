//! Product Repository
//!
//! Catalog CRUD only. Stock decrements never happen here — the checkout
//! transaction is the single write path for `stock_quantity` decrements.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, Product, ProductCreate, ProductUpdate, derive_sku};
use crate::utils::time::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Product>> {
        let cat = parse_record_id("category", category_id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE category = $cat AND is_active = true ORDER BY name")
            .bind(("cat", cat.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// Create a product, deriving the SKU when the caller did not supply one
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0.0 {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        if data.stock_quantity < 0 {
            return Err(RepoError::Validation(
                "stock_quantity must be non-negative".into(),
            ));
        }

        let category = parse_record_id("category", &data.category)?;
        let category_rec: Option<Category> = self.base.db().select(category.clone()).await?;
        let category_rec = category_rec
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", data.category)))?;

        // The SKU derives from the record key, so the key is generated
        // client-side before the create
        let key = uuid::Uuid::new_v4().simple().to_string();
        let sku = match data.sku {
            Some(sku) if !sku.is_empty() => sku,
            _ => derive_sku(
                data.brand.as_deref(),
                &category_rec.name,
                &key,
                data.variant.as_deref(),
            ),
        };

        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            brand: data.brand,
            price: data.price,
            stock_quantity: data.stock_quantity,
            category,
            sku,
            variant: data.variant,
            images: data.images.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(RecordId::from_table_key(PRODUCT_TABLE, key))
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update catalog fields (never a checkout-path stock decrement)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        if let Some(stock) = data.stock_quantity
            && stock < 0
        {
            return Err(RepoError::Validation(
                "stock_quantity must be non-negative".into(),
            ));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.brand.is_some() {
            set_parts.push("brand = $brand");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.stock_quantity.is_some() {
            set_parts.push("stock_quantity = $stock_quantity");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.variant.is_some() {
            set_parts.push("variant = $variant");
        }
        if data.images.is_some() {
            set_parts.push("images = $images");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }
        set_parts.push("updated_at = $updated_at");

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("rid", rid))
            .bind(("updated_at", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.brand {
            query = query.bind(("brand", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.stock_quantity {
            query = query.bind(("stock_quantity", v));
        }
        if let Some(v) = data.category {
            let cat = parse_record_id("category", &v)?;
            query = query.bind(("category", cat.to_string()));
        }
        if let Some(v) = data.variant {
            query = query.bind(("variant", v));
        }
        if let Some(v) = data.images {
            query = query.bind(("images", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let result: Option<Product> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }
}
