use std::time::Duration;

use crate::auth::JwtConfig;

/// Server configuration, loaded from the environment.
///
/// | Variable            | Default              |
/// |---------------------|----------------------|
/// | WORK_DIR            | /var/lib/shop/server |
/// | HTTP_PORT           | 3000                 |
/// | ENVIRONMENT         | development          |
/// | REQUEST_TIMEOUT_MS  | 30000                |
/// | SHUTDOWN_TIMEOUT_MS | 10000                |
/// | PAYMENT_GATEWAY_URL | http://localhost:9090|
/// | PAYMENT_API_KEY     | (unset)              |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Upper bound on a single storage transaction (millis)
    pub request_timeout_ms: u64,
    /// Graceful shutdown window (millis)
    pub shutdown_timeout_ms: u64,
    /// Payment collection gateway base URL
    pub payment_gateway_url: String,
    /// Bearer key for the payment gateway, if required
    pub payment_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/shop/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            payment_gateway_url: std::env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9090".into()),
            payment_api_key: std::env::var("PAYMENT_API_KEY").ok(),
        }
    }

    /// Override the filesystem and network bindings, keeping everything
    /// else from the environment. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Path of the embedded database under the work dir
    pub fn db_path(&self) -> String {
        format!("{}/data", self.work_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
