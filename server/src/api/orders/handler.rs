//! Order API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::checkout::{self, PlacedOrder};
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, OrderStatusUpdate, Shipping};
use crate::db::repository::{OrderRepository, ShippingRepository};
use crate::fulfillment;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Shipping address id (must belong to the caller)
    pub address: String,
}

/// POST /api/orders - place an order from the caller's cart
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<PlacedOrder>> {
    let placed = checkout::place_order(
        &state.db,
        &user.id,
        &req.address,
        state.config.request_timeout(),
    )
    .await?;

    tracing::info!(
        target: "checkout",
        user = %user.id,
        order = ?placed.order.id,
        total = placed.order.total_amount,
        "Order placed"
    );

    Ok(Json(placed))
}

/// GET /api/orders - own orders; admins see every order
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = if user.role.is_admin() {
        repo.find_all().await?
    } else {
        repo.find_by_owner(&user.id).await?
    };
    Ok(Json(orders))
}

/// GET /api/orders/:id - owner or elevated roles
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = if user.role.is_elevated() {
        repo.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?
    } else {
        repo.find_owned(&id, &user.id).await?
    };
    Ok(Json(order))
}

/// PUT /api/orders/:id/status - courier/admin only
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    user.require_elevated()?;

    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown order status: {}", req.status)))?;

    let order = fulfillment::update_order_status(
        &state.db,
        &id,
        status,
        state.config.request_timeout(),
    )
    .await?;

    Ok(Json(order))
}

/// GET /api/orders/:id/shipping - the order's shipping record
pub async fn get_shipping(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Shipping>> {
    // Resolve the order first so ownership rules match get_by_id
    let orders = OrderRepository::new(state.db.clone());
    let order = if user.role.is_elevated() {
        orders
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?
    } else {
        orders.find_owned(&id, &user.id).await?
    };

    let order_id = order
        .id
        .as_ref()
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::internal("Loaded order without id"))?;

    let shipping = ShippingRepository::new(state.db.clone())
        .find_by_order(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No shipping record for order {}", id)))?;

    Ok(Json(shipping))
}
