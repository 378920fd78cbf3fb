//! Payment API handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::OrderStatus;
use crate::db::repository::OrderRepository;
use crate::payment::{PaymentAck, PaymentRequest};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub order_id: String,
    pub phone_number: String,
}

/// POST /api/payments/initiate - ask the gateway to collect for an order
///
/// Returns the gateway acknowledgement; confirmation arrives out of band.
pub async fn initiate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<InitiatePaymentRequest>,
) -> AppResult<Json<PaymentAck>> {
    let phone = req.phone_number.trim();
    if phone.is_empty() {
        return Err(AppError::validation("A phone number is required"));
    }

    // Only the order's owner may pay for it
    let order = OrderRepository::new(state.db.clone())
        .find_owned(&req.order_id, &user.id)
        .await?;

    if order.paid || order.status == OrderStatus::Paid {
        return Err(AppError::invalid_state("Order is already paid"));
    }

    let order_id = order
        .id
        .as_ref()
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::internal("Loaded order without id"))?;

    let ack = state
        .payment_gateway
        .initiate(PaymentRequest {
            order_id,
            phone_number: phone.to_string(),
            amount: order.total_amount,
        })
        .await?;

    tracing::info!(
        target: "payment",
        order = %req.order_id,
        reference = %ack.reference,
        "Collection initiated"
    );

    Ok(Json(ack))
}
