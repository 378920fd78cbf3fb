//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::models::{User, UserLogin, UserRegister, UserView};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{AppError, AppResult, now_millis};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// POST /api/auth/register - create a customer account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserRegister>,
) -> AppResult<Json<UserView>> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if req.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = User {
        id: None,
        email: req.email.trim().to_lowercase(),
        password_hash,
        name: req.name.trim().to_string(),
        phone: req.phone,
        role: Role::Customer,
        created_at: now_millis(),
    };

    let repo = UserRepository::new(state.db.clone());
    let created = repo.create(user).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::Conflict("Email is already registered".to_string()),
        other => other.into(),
    })?;

    Ok(Json(created.into()))
}

/// POST /api/auth/login - verify credentials and issue a JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<UserLogin>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email.trim().to_lowercase()).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::internal("Loaded user without id"))?;

    let token = state
        .jwt_service
        .generate_token(&user_id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me - resolve the caller's account
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserView>> {
    let repo = UserRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&user.id_string())
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;

    Ok(Json(account.into()))
}
