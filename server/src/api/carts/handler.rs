//! Cart API handlers
//!
//! Adding an item snapshots the product's current price into the line; the
//! cart keeps that price even if the catalog changes afterwards.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Cart, CartItemAdd, CartItemUpdate};
use crate::db::repository::{CartRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/cart - the caller's cart, or an empty one
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Option<Cart>>> {
    let repo = CartRepository::new(state.db.clone());
    let cart = repo.find_by_owner(&user.id).await?;
    Ok(Json(cart))
}

/// POST /api/cart/items - add a product (or raise an existing line's quantity)
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemAdd>,
) -> AppResult<Json<Cart>> {
    if payload.quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let products = ProductRepository::new(state.db.clone());
    let product = products
        .find_by_id(&payload.product)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", payload.product)))?;

    if !product.is_active {
        return Err(AppError::validation("Product is not available"));
    }

    let product_rid = product
        .id
        .ok_or_else(|| AppError::internal("Loaded product without id"))?;

    let carts = CartRepository::new(state.db.clone());
    let cart = carts
        .add_item(&user.id, product_rid, payload.quantity, product.price)
        .await?;
    Ok(Json(cart))
}

/// PUT /api/cart/items/:product_id - set a line's quantity
pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<Cart>> {
    let repo = CartRepository::new(state.db.clone());
    let cart = repo
        .update_item(&user.id, &product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

/// DELETE /api/cart/items/:product_id - drop a line
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<Cart>> {
    let repo = CartRepository::new(state.db.clone());
    let cart = repo.remove_item(&user.id, &product_id).await?;
    Ok(Json(cart))
}

/// DELETE /api/cart - discard the whole cart
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<bool>> {
    let repo = CartRepository::new(state.db.clone());
    repo.delete_by_owner(&user.id).await?;
    Ok(Json(true))
}
