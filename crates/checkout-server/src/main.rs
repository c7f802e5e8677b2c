//! checkout-server
//!
//! Axum-based server for Razorpay order creation, subscription creation and
//! payment signature verification.

use checkout_gateway::RazorpayClient;
use checkout_server::{
    AppState, CREATE_ORDER_PATH, CREATE_SUBSCRIPTION_PATH, ServerConfig, VERIFY_PAYMENT_PATH,
    router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    if let Some(gateway) = &config.gateway {
        tracing::info!(
            key_id = %gateway.key_id,
            api_base = %gateway.api_base,
            "✓ Razorpay configured"
        );
    } else {
        tracing::warn!("⚠ Razorpay not configured - payment endpoints will answer 500");
        tracing::warn!("  Set RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET in .env");
    }

    let state = AppState::new(config.gateway.map(RazorpayClient::new));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("checkout-server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST {}", CREATE_ORDER_PATH);
    tracing::info!("  POST {}", CREATE_SUBSCRIPTION_PATH);
    tracing::info!("  POST {}", VERIFY_PAYMENT_PATH);

    axum::serve(listener, app).await?;

    Ok(())
}
