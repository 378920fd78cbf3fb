//! Shipping API module
//!
//! `PUT /{id}` is the fulfillment entry point for couriers and admins.

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shipping", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{id}", get(handler::get_by_id).put(handler::update))
}
