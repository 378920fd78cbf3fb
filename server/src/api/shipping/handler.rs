//! Shipping API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Shipping, ShippingUpdate};
use crate::db::repository::{OrderRepository, ShippingRepository};
use crate::fulfillment;
use crate::utils::{AppError, AppResult};

/// GET /api/shipping/:id - elevated roles, or the owner of the linked order
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Shipping>> {
    let repo = ShippingRepository::new(state.db.clone());
    let shipping = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shipping {} not found", id)))?;

    if !user.role.is_elevated() {
        // find_owned answers NotFound for foreign orders, hiding the record
        OrderRepository::new(state.db.clone())
            .find_owned(&shipping.order.to_string(), &user.id)
            .await
            .map_err(|_| AppError::not_found(format!("Shipping {} not found", id)))?;
    }

    Ok(Json(shipping))
}

/// PUT /api/shipping/:id - courier/admin only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ShippingUpdate>,
) -> AppResult<Json<Shipping>> {
    user.require_elevated()?;

    let shipping = fulfillment::update_shipping_status(
        &state.db,
        &id,
        req,
        state.config.request_timeout(),
    )
    .await?;

    Ok(Json(shipping))
}
