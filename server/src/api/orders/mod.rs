//! Order API module
//!
//! `POST /` runs the checkout transaction. `PUT /{id}/status` is the
//! fulfillment entry point for couriers and admins.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/shipping", get(handler::get_shipping))
}
