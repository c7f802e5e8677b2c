//! # checkout-server
//!
//! Axum service backing the browser checkout flow. It holds the Razorpay
//! credentials and exposes three functions plus a health check:
//!
//! | route                                             | role     |
//! |---------------------------------------------------|----------|
//! | `POST /functions/v1/create-razorpay-order`        | issuer   |
//! | `POST /functions/v1/create-razorpay-subscription` | issuer   |
//! | `POST /functions/v1/verify-razorpay-payment`      | verifier |
//! | `GET  /health`                                    |          |
//!
//! Every response is JSON. Failures carry a single `error` string.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
pub use state::AppState;

pub const CREATE_ORDER_PATH: &str = "/functions/v1/create-razorpay-order";
pub const CREATE_SUBSCRIPTION_PATH: &str = "/functions/v1/create-razorpay-subscription";
pub const VERIFY_PAYMENT_PATH: &str = "/functions/v1/verify-razorpay-payment";

/// CORS policy shared by every route: any origin, the headers browser
/// function clients send, and pre-flight answered by the layer itself.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(CREATE_ORDER_PATH, post(handlers::create_order))
        .route(CREATE_SUBSCRIPTION_PATH, post(handlers::create_subscription))
        .route(VERIFY_PAYMENT_PATH, post(handlers::verify_payment))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
