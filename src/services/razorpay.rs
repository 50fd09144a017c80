//! Razorpay payment provider client.
//!
//! Implements the Orders API for payment initiation and HMAC signature
//! verification for payment confirmation.

use crate::config::RazorpayConfig;
use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Currency for all orders. The checkout flow is INR-only.
pub const CURRENCY: &str = "INR";

/// Razorpay client for interacting with the Razorpay API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

/// Wire body for order creation. Amount is in the smallest currency unit
/// (paise); the gateway rejects fractional values.
#[derive(Debug, Serialize)]
struct CreateOrderBody {
    amount: u64,
    currency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<serde_json::Value>,
}

/// A gateway-side order, passed through to callers verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    /// Razorpay order ID (hand this to the client SDK).
    pub id: String,
    /// Entity type (always "order").
    pub entity: String,
    /// Amount in smallest currency unit.
    pub amount: u64,
    /// Amount paid so far.
    pub amount_paid: u64,
    /// Amount due.
    pub amount_due: u64,
    /// Currency code.
    pub currency: String,
    /// Receipt ID.
    pub receipt: Option<String>,
    /// Order status.
    pub status: String,
    /// Number of payment attempts.
    pub attempts: u32,
    /// Notes attached to the order.
    pub notes: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: u64,
}

/// Razorpay API error response.
#[derive(Debug, Deserialize)]
pub struct RazorpayError {
    pub error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayErrorDetail {
    pub code: String,
    pub description: String,
    pub source: Option<String>,
    pub step: Option<String>,
    pub reason: Option<String>,
}

/// The confirmation triple the client posts back after checkout.
#[derive(Debug)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Convert a major-unit amount (rupees) to minor units (paise).
///
/// Rounds half away from zero so a fractional paise never undercharges.
pub fn to_minor_units(amount_major: f64) -> Result<u64> {
    if !amount_major.is_finite() || amount_major <= 0.0 {
        return Err(anyhow!(
            "amount must be a positive finite number of rupees, got {}",
            amount_major
        ));
    }
    Ok((amount_major * 100.0).round() as u64)
}

impl RazorpayClient {
    /// Create a new Razorpay client from explicit credentials.
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a new order in Razorpay.
    ///
    /// `amount_major` is in rupees; the conversion to paise happens here.
    /// Calling twice creates two distinct gateway orders; retries are the
    /// caller's decision.
    pub async fn create_order(
        &self,
        amount_major: f64,
        receipt: Option<String>,
        notes: Option<serde_json::Value>,
    ) -> Result<RazorpayOrder> {
        let amount = to_minor_units(amount_major)?;

        let request = CreateOrderBody {
            amount,
            currency: CURRENCY,
            receipt,
            notes,
        };

        let url = format!("{}/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Razorpay create_order response");

        if status.is_success() {
            let order: RazorpayOrder = serde_json::from_str(&body)?;
            tracing::info!(
                order_id = %order.id,
                amount = order.amount,
                currency = %order.currency,
                "Razorpay order created"
            );
            Ok(order)
        } else {
            let error: RazorpayError =
                serde_json::from_str(&body).unwrap_or_else(|_| RazorpayError {
                    error: RazorpayErrorDetail {
                        code: "UNKNOWN".to_string(),
                        description: body.clone(),
                        source: None,
                        step: None,
                        reason: None,
                    },
                });
            tracing::error!(
                code = %error.error.code,
                description = %error.error.description,
                "Razorpay order creation failed"
            );
            Err(anyhow!(
                "Razorpay error: {} - {}",
                error.error.code,
                error.error.description
            ))
        }
    }

    /// Fetch an existing order by ID. Returns `None` when the gateway has
    /// no order with that ID.
    pub async fn get_order(&self, order_id: &str) -> Result<Option<RazorpayOrder>> {
        let url = format!("{}/orders/{}", self.config.api_base_url, order_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if status.is_success() {
            let order: RazorpayOrder = serde_json::from_str(&body)?;
            Ok(Some(order))
        } else {
            Err(anyhow!("failed to fetch Razorpay order: {}", body))
        }
    }

    /// Decide whether a checkout confirmation is authentic.
    ///
    /// The signature is `hex(HMAC-SHA256(order_id + "|" + payment_id))`
    /// keyed with the merchant secret. This is a boolean trust decision:
    /// malformed input or an internal failure is `false`, never an error,
    /// so ambiguity can never read as "trusted".
    pub fn verify_payment_signature(&self, verification: &PaymentVerification) -> bool {
        let payload = format!(
            "{}|{}",
            verification.razorpay_order_id, verification.razorpay_payment_id
        );

        let expected = match compute_signature(&payload, self.config.key_secret.expose_secret()) {
            Ok(signature) => signature,
            Err(err) => {
                tracing::error!(error = %err, "signature computation failed");
                return false;
            }
        };

        let supplied = verification.razorpay_signature.as_bytes();
        if expected.len() != supplied.len() {
            tracing::warn!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "payment signature length mismatch"
            );
            return false;
        }

        let is_valid: bool = expected.as_bytes().ct_eq(supplied).into();

        if is_valid {
            tracing::info!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "payment signature verified"
            );
        } else {
            tracing::warn!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "payment signature verification failed"
            );
        }

        is_valid
    }
}

/// Compute a hex-encoded HMAC-SHA256 signature.
fn compute_signature(payload: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| anyhow!("invalid key length"))?;
    mac.update(payload.as_bytes());
    let result = mac.finalize();
    Ok(hex::encode(result.into_bytes()))
}
