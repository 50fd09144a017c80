//! Order creation and payment verification handlers.
//!
//! The mobile checkout posts an amount in rupees, hands the returned order
//! ID to the Razorpay client SDK, then posts the confirmation triple back
//! for verification.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    services::razorpay::{PaymentVerification, RazorpayOrder},
    AppState,
};

/// Request to create a new payment order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in major currency units (rupees).
    pub amount: f64,
    /// Optional receipt ID for tracking.
    pub receipt: Option<String>,
    /// Optional notes to attach to the order.
    pub notes: Option<serde_json::Value>,
}

/// Response after creating an order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// The gateway order, verbatim. Use `order.id` in the client SDK.
    pub order: RazorpayOrder,
    /// Razorpay key ID (for client SDK initialization).
    pub razorpay_key_id: String,
}

/// Request to verify a payment after checkout.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// The boolean trust decision.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub valid: bool,
}

/// Passthrough wrapper for a fetched order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: RazorpayOrder,
}

/// Create a new Razorpay order for the given rupee amount.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "amount must be a positive number of rupees"
        )));
    }

    tracing::info!(amount = payload.amount, "creating payment order");

    let order = state
        .razorpay
        .create_order(payload.amount, payload.receipt, payload.notes)
        .await
        .map_err(|e| {
            metrics::counter!("order_creation_failures_total").increment(1);
            AppError::OrderCreationFailed(e)
        })?;

    metrics::counter!("orders_created_total").increment(1);

    tracing::info!(order_id = %order.id, "payment order created");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order,
            razorpay_key_id: state.config.razorpay.key_id.clone(),
        }),
    ))
}

/// Fetch a gateway order by ID.
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .razorpay
        .get_order(&order_id)
        .await
        .map_err(AppError::InternalError)?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("order not found")))?;

    Ok(Json(OrderResponse { order }))
}

/// Verify a payment confirmation after checkout completion.
///
/// Always answers 200 with a boolean; a forged or malformed confirmation
/// is `valid: false`, never an error.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Json<VerifyPaymentResponse> {
    let verification = PaymentVerification {
        razorpay_order_id: payload.razorpay_order_id,
        razorpay_payment_id: payload.razorpay_payment_id,
        razorpay_signature: payload.razorpay_signature,
    };

    let valid = state.razorpay.verify_payment_signature(&verification);

    metrics::counter!(
        "signature_verifications_total",
        "result" => if valid { "valid" } else { "invalid" }
    )
    .increment(1);

    Json(VerifyPaymentResponse { valid })
}
