//! Address API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::db::repository::AddressRepository;
use crate::utils::AppResult;

/// GET /api/addresses - the caller's address book
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Address>>> {
    let repo = AddressRepository::new(state.db.clone());
    let addresses = repo.find_by_owner(&user.id).await?;
    Ok(Json(addresses))
}

/// GET /api/addresses/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.db.clone());
    let address = repo.find_owned(&id, &user.id).await?;
    Ok(Json(address))
}

/// POST /api/addresses
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.db.clone());
    let address = repo.create(user.id.clone(), payload).await?;
    Ok(Json(address))
}

/// PUT /api/addresses/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.db.clone());
    let address = repo.update(&id, &user.id, payload).await?;
    Ok(Json(address))
}

/// DELETE /api/addresses/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AddressRepository::new(state.db.clone());
    repo.delete(&id, &user.id).await?;
    Ok(Json(true))
}
