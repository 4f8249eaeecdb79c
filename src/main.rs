use anyhow::Result;
use pnlcurve_backend::create_router;
use pnlcurve_backend::api::handlers::AppState;
use pnlcurve_backend::infrastructure::HyperliquidClient;
use pnlcurve_backend::services::PnlAggregator;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("Starting PnL Curve Backend");

    // Load configuration from environment
    let info_url = std::env::var("HYPERLIQUID_API_URL")
        .unwrap_or_else(|_| "https://api.hyperliquid.xyz/info".to_string());

    let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse::<u64>()
        .expect("Invalid HTTP_TIMEOUT_SECS");

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .expect("Invalid PORT");

    info!("Configuration:");
    info!("  Info URL: {}", info_url);
    info!("  Request timeout: {}s", timeout_secs);
    info!("  Port: {}", port);

    // Initialize exchange client and aggregation service
    let client = Arc::new(HyperliquidClient::new(
        info_url,
        Duration::from_secs(timeout_secs),
    ));
    let aggregator = Arc::new(PnlAggregator::new(client));
    info!("PnL aggregator initialized");

    // Create app state
    let state = AppState { aggregator };

    // Create router with middleware
    let app = create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start HTTP server
    let addr = format!("0.0.0.0:{}", port);
    info!("HTTP server starting on {}", addr);
    info!("Ready to accept connections!");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
