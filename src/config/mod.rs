use crate::error::AppError;
use anyhow::anyhow;
use dotenvy::dotenv;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Merchant credentials are mandatory; a missing or empty key aborts
    /// startup instead of producing a client that signs nothing.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let host = env::var("CHECKOUT_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("CHECKOUT_SERVICE_PORT")
            .unwrap_or_else(|_| "3003".to_string())
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow!("invalid CHECKOUT_SERVICE_PORT: {}", e)))?;

        let key_id = env::var("RAZORPAY_KEY_ID")
            .map_err(|_| AppError::ConfigError(anyhow!("RAZORPAY_KEY_ID must be set")))?;
        let key_secret = env::var("RAZORPAY_KEY_SECRET")
            .map_err(|_| AppError::ConfigError(anyhow!("RAZORPAY_KEY_SECRET must be set")))?;
        let api_base_url = env::var("RAZORPAY_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());

        let razorpay = RazorpayConfig {
            key_id,
            key_secret: Secret::new(key_secret),
            api_base_url,
        };

        if razorpay.key_id.is_empty() || razorpay.key_secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow!(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must not be empty"
            )));
        }

        Ok(Self {
            server: ServerConfig { host, port },
            razorpay,
            service_name: "checkout-service".to_string(),
        })
    }
}
