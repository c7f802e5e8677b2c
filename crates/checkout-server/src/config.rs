//! Server configuration

use checkout_gateway::GatewayConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process-level settings read at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Vendor credentials, absent when the environment does not provide them
    pub gateway: Option<GatewayConfig>,
}

impl ServerConfig {
    /// Create from environment variables (`BIND_ADDR`, `RAZORPAY_*`)
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        Self {
            bind_addr,
            gateway: GatewayConfig::from_env().ok(),
        }
    }
}
