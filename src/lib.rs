pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use config::Config;
use error::AppError;
use services::RazorpayClient;

/// Shared application state. Cheap to clone; everything inside is either
/// a handle or immutable configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub razorpay: RazorpayClient,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// The listener is bound here (port 0 = random port for testing).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        services::init_metrics();

        let razorpay = RazorpayClient::new(config.razorpay.clone());

        let state = AppState {
            config: config.clone(),
            razorpay,
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/orders", post(handlers::orders::create_order))
            .route("/orders/:id", get(handlers::orders::get_order))
            .route("/payments/verify", post(handlers::orders::verify_payment))
            .layer(from_fn(middleware::request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get(middleware::REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        let host: IpAddr = config
            .server
            .host
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("invalid host: {}", e)))?;
        let addr = SocketAddr::new(host, config.server.port);

        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tracing::info!("checkout-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
