//! # checkout-gateway
//!
//! Server-side Razorpay integration for the checkout flow.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  create order /   ┌────────────────┐  POST /orders        ┌────────────┐
//! │   Browser   │  subscription     │ checkout-server│  POST /subscriptions │  Razorpay  │
//! │  (trigger)  │──────────────────▶│                │─────────────────────▶│  REST API  │
//! └─────────────┘                   └────────────────┘                      └────────────┘
//!        │  widget completes with {payment_id, order_id, signature}
//!        ▼
//!   verify-razorpay-payment ──▶ HMAC-SHA256(key_secret) compared in constant time
//! ```
//!
//! The key secret never leaves the server. Only the key id is returned to
//! the browser, which needs it to open the hosted widget.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_gateway::{CreateOrder, Notes, RazorpayClient};
//!
//! let client = RazorpayClient::from_env()?;
//! let order = client
//!     .create_order(&CreateOrder::new(50_000, "INR", Notes::new()))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
pub mod signature;
mod types;

pub use client::RazorpayClient;
pub use config::{DEFAULT_API_BASE, GatewayConfig};
pub use error::{GatewayError, Result};
pub use signature::SignedIntent;
pub use types::{CreateOrder, CreateSubscription, Notes, Order, Subscription};
