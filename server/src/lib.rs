//! Shop Server - e-commerce backend
//!
//! # Architecture
//!
//! - **Storage** (`db`): embedded SurrealDB; every multi-record write runs
//!   as one transaction script
//! - **Checkout** (`checkout`): the cart-to-order transaction
//! - **Fulfillment** (`fulfillment`): keeps order and shipping status in step
//! - **Payment** (`payment`): gateway boundary for collection
//! - **Auth** (`auth`): JWT + Argon2
//! - **HTTP API** (`api`): RESTful routes, one module per resource
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # JWT, roles, extractor
//! ├── api/           # routes and handlers
//! ├── checkout/      # order placement transaction
//! ├── fulfillment/   # order/shipping status sync
//! ├── payment/       # payment gateway client
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, time
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod payment;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use db::{DbService, define_schema};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, pick a log sink based on ENVIRONMENT, and initialize tracing.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
    if environment == "production" {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/shop/server".into());
        let log_dir = format!("{}/logs", work_dir);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create log dir: {e}"))?;
        init_logger_with_file(None, Some(&log_dir))?;
    } else {
        init_logger()?;
    }

    Ok(())
}
