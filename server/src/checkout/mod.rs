//! Checkout — the order placement transaction
//!
//! The one place where multiple mutable entities (cart, product stock, order,
//! shipping) move together. All-or-nothing: see [`engine::place_order`].

pub mod engine;
pub mod error;

pub use engine::{PlacedOrder, place_order};
pub use error::CheckoutError;
