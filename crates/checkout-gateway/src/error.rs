//! Gateway Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors raised while talking to the payment vendor
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Vendor credentials are missing from the environment
    #[error("Payment gateway not configured")]
    NotConfigured,

    /// Request rejected before reaching the vendor
    #[error("{0}")]
    Validation(String),

    /// Vendor answered with a non-2xx status
    #[error("{message}")]
    Vendor { status: u16, message: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unreadable request or response body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status a server should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::Vendor { status, .. } => *status,
            GatewayError::NotConfigured | GatewayError::Http(_) | GatewayError::Json(_) => 500,
        }
    }

    /// Vendor rejections and validation errors are caused by the request itself
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Message safe to hand back to the caller
    pub fn user_message(&self) -> &str {
        match self {
            GatewayError::NotConfigured => "Payment gateway not configured",
            GatewayError::Validation(message) | GatewayError::Vendor { message, .. } => message,
            GatewayError::Http(_) => "Payment gateway unreachable. Please try again.",
            GatewayError::Json(_) => "Unexpected response from payment gateway.",
        }
    }
}
