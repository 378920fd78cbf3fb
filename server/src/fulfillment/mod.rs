//! Keeps order and shipping status in step.
//!
//! Status changes on either record may imply a change on its counterpart.
//! Both update paths run as a single database transaction so the pair can
//! never be observed half-updated.

pub mod error;
pub mod status;
pub mod sync;

pub use error::SyncError;
pub use status::{implied_order_status, implied_shipping_status};
pub use sync::{update_order_status, update_shipping_status};
