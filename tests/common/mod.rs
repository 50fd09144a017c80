use checkout_service::config::{Config, RazorpayConfig, ServerConfig};
use checkout_service::Application;
use secrecy::Secret;

pub const TEST_KEY_ID: &str = "test_key_id";
pub const TEST_KEY_SECRET: &str = "test_key_secret";

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service against the given gateway base URL (usually a
    /// wiremock server standing in for the Razorpay API).
    pub async fn spawn(api_base_url: &str) -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            razorpay: RazorpayConfig {
                key_id: TEST_KEY_ID.to_string(),
                key_secret: Secret::new(TEST_KEY_SECRET.to_string()),
                api_base_url: api_base_url.to_string(),
            },
            service_name: "checkout-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address, port }
    }
}
