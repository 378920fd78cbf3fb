//! Checkout errors
//!
//! Each kind carries a different caller retry policy: stock races are
//! retryable after refreshing the cart, transient storage failures are
//! retryable as-is, missing address/product need user correction first.

use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Address {0} not found")]
    AddressNotFound(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product {0} no longer exists")]
    MissingProduct(String),

    #[error("Not enough stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    #[error("Checkout timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::AddressNotFound(id) => {
                AppError::not_found(format!("Address {} not found", id))
            }
            CheckoutError::EmptyCart => AppError::invalid_state("Cart is empty"),
            CheckoutError::MissingProduct(id) => {
                AppError::not_found(format!("Product {} no longer exists", id))
            }
            CheckoutError::InsufficientStock {
                product,
                requested,
                available,
            } => AppError::InsufficientStock {
                product,
                requested,
                available,
            },
            CheckoutError::Timeout => AppError::Transient("checkout timed out".to_string()),
            CheckoutError::Database(msg) => AppError::Database(msg),
        }
    }
}
