//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). SurrealDB gives the multi-document
//! ACID transactions the checkout and status-sync paths depend on; any write
//! spanning more than one record goes through a single
//! `BEGIN TRANSACTION; ...; COMMIT TRANSACTION;` script.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "shop";
const DATABASE: &str = "shop";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready at {} (SurrealDB embedded, RocksDB)", db_path);

        Ok(Self { db })
    }
}

/// Table and index definitions.
///
/// Tables are schemaless (models are enforced at the application layer); the
/// indexes carry the uniqueness invariants: one cart per user, one shipping
/// record per order, unique SKU and account email.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    let ddl = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS category SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS product_sku ON product FIELDS sku UNIQUE;

        DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS cart_owner ON cart FIELDS owner UNIQUE;

        DEFINE TABLE IF NOT EXISTS address SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS address_owner ON address FIELDS owner;

        -- "order" is a reserved word in SurrealQL, hence the plural table name
        DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS orders_owner ON orders FIELDS owner;

        DEFINE TABLE IF NOT EXISTS shipping SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS shipping_order ON shipping FIELDS order UNIQUE;
    "#;

    db.query(ddl)
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;

    Ok(())
}
