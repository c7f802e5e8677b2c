//! Application State

use std::sync::Arc;

use checkout_gateway::RazorpayClient;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    /// Razorpay client (None if credentials are not configured)
    pub gateway: Option<Arc<RazorpayClient>>,
}

impl AppState {
    pub fn new(gateway: Option<RazorpayClient>) -> Self {
        Self {
            gateway: gateway.map(Arc::new),
        }
    }
}
