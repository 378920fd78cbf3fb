//! Payment initiation boundary.
//!
//! Checkout never blocks on payment: the handler asks the gateway to start
//! collection and returns its acknowledgement. Confirmation arrives through
//! a separate channel and is handled elsewhere.

pub mod gateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gateway::HttpPaymentGateway;

use crate::utils::AppError;

/// What the gateway needs to start collecting a payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub order_id: String,
    pub phone_number: String,
    pub amount: f64,
}

/// Gateway acknowledgement. `status` is `"pending"` until the gateway
/// confirms out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAck {
    pub order_id: String,
    pub reference: String,
    pub status: String,
    pub amount: f64,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment rejected: {0}")]
    Rejected(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Rejected(msg) => AppError::validation(msg),
            PaymentError::Gateway(msg) => AppError::Transient(msg),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(&self, request: PaymentRequest) -> Result<PaymentAck, PaymentError>;
}
