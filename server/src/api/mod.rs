//! API route modules
//!
//! One module per resource, each exposing `router() -> Router<ServerState>`:
//!
//! - [`health`] - health check
//! - [`auth`] - register / login / me
//! - [`categories`] - catalog categories
//! - [`products`] - catalog products
//! - [`carts`] - the caller's cart
//! - [`addresses`] - the caller's address book
//! - [`orders`] - checkout and order status
//! - [`shipping`] - shipping records and courier updates
//! - [`payments`] - payment initiation

pub mod addresses;
pub mod auth;
pub mod carts;
pub mod categories;
pub mod health;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shipping;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
