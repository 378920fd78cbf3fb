//! Repository Module
//!
//! CRUD access to SurrealDB tables. Repositories handle single-entity reads
//! and writes; anything that must move multiple entities together (checkout,
//! status sync) lives in its own module and runs a transaction script.

pub mod address;
pub mod cart;
pub mod category;
pub mod orders;
pub mod product;
pub mod shipping;
pub mod user;

pub use address::AddressRepository;
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use orders::OrderRepository;
pub use product::ProductRepository;
pub use shipping::ShippingRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as index errors from the engine
        if msg.contains("already contains") || msg.contains("unique") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:key" string, rejecting ids from other tables
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    let rid: surrealdb::RecordId = if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid id format: {}", id)))?
    } else {
        surrealdb::RecordId::from_table_key(table, id)
    };
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected {} id, got: {}",
            table, id
        )));
    }
    Ok(rid)
}
