//! Trigger Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, TriggerError>;

/// Reasons a purchase attempt failed
///
/// Every variant is terminal for the attempt: nothing is retried, a new
/// user action starts a new attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// The vendor checkout script could not be loaded
    #[error("Failed to load payment gateway")]
    GatewayUnavailable,

    /// One-time payments need a positive amount in minor units
    #[error("Amount must be a positive integer in minor units")]
    InvalidAmount,

    /// The issuer answered with an `error` field (message kept verbatim)
    #[error("{0}")]
    Issuer(String),

    /// A function call never produced a usable response
    #[error("{0}")]
    Transport(String),

    /// The widget could not be opened
    #[error("Failed to open checkout: {0}")]
    Widget(String),

    /// The verifier did not confirm the payment
    #[error("Payment verification failed")]
    VerificationFailed,
}

impl TriggerError {
    /// Short text suitable for a toast
    pub fn user_message(&self) -> &str {
        match self {
            TriggerError::GatewayUnavailable => "Failed to load payment gateway",
            TriggerError::InvalidAmount => "Amount must be a positive integer in minor units",
            TriggerError::Issuer(message) => message,
            TriggerError::Transport(_) => "Could not reach the payment service. Please try again.",
            TriggerError::Widget(_) => "Failed to open checkout",
            TriggerError::VerificationFailed => "Payment verification failed",
        }
    }
}

impl From<reqwest::Error> for TriggerError {
    fn from(err: reqwest::Error) -> Self {
        TriggerError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TriggerError {
    fn from(err: serde_json::Error) -> Self {
        TriggerError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TriggerError::GatewayUnavailable.to_string(),
            "Failed to load payment gateway"
        );
        assert_eq!(
            TriggerError::VerificationFailed.to_string(),
            "Payment verification failed"
        );
        assert_eq!(
            TriggerError::Issuer("Plan ID is required".into()).to_string(),
            "Plan ID is required"
        );
    }

    #[test]
    fn test_user_message_keeps_issuer_text_and_hides_transport_details() {
        assert_eq!(
            TriggerError::Issuer("The id provided does not exist".into()).user_message(),
            "The id provided does not exist"
        );
        assert_eq!(
            TriggerError::Transport("error sending request for url".into()).user_message(),
            "Could not reach the payment service. Please try again."
        );
        assert_eq!(
            TriggerError::Widget("script missing".into()).user_message(),
            "Failed to open checkout"
        );
        assert_eq!(
            TriggerError::VerificationFailed.user_message(),
            TriggerError::VerificationFailed.to_string()
        );
    }
}
