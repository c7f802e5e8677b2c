//! Vendor credentials

use crate::error::{GatewayError, Result};

/// Default Razorpay REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Razorpay credentials held server-side
#[derive(Clone)]
pub struct GatewayConfig {
    /// Public key identifier, handed to the browser widget
    pub key_id: String,

    /// Secret used for API auth and signature verification
    pub key_secret: String,

    /// REST base URL (overridable for sandboxes and tests)
    pub api_base: String,
}

impl GatewayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    /// Point the client at a different REST base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Create from environment variables
    ///
    /// Reads `RAZORPAY_KEY_ID`, `RAZORPAY_KEY_SECRET` and optionally
    /// `RAZORPAY_API_BASE`. Empty values count as missing.
    pub fn from_env() -> Result<Self> {
        let key_id = non_empty_var("RAZORPAY_KEY_ID")?;
        let key_secret = non_empty_var("RAZORPAY_KEY_SECRET")?;

        let config = Self::new(key_id, key_secret);
        Ok(match std::env::var("RAZORPAY_API_BASE") {
            Ok(base) if !base.trim().is_empty() => config.with_api_base(base),
            _ => config,
        })
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GatewayError::NotConfigured),
    }
}
