use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payment::{HttpPaymentGateway, PaymentGateway};
use crate::utils::AppError;

/// Shared handles for every request handler.
///
/// Cloning is shallow: the database connection and services are reference
/// counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB over RocksDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
}

impl ServerState {
    /// Open the database, apply the schema, and wire up services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(config.db_path())
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_service = DbService::new(&config.db_path()).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let payment_gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
            config.payment_gateway_url.clone(),
            config.payment_api_key.clone(),
        ));

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            payment_gateway,
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
