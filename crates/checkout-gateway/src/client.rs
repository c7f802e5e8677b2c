//! Razorpay REST client

use serde::{Serialize, de::DeserializeOwned};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::signature::{self, SignedIntent};
use crate::types::{CreateOrder, CreateSubscription, Order, Subscription, VendorErrorEnvelope};

/// Razorpay client wrapper
pub struct RazorpayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl RazorpayClient {
    /// Create a new client from credentials
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    /// Public key identifier handed to the checkout widget
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Create a one-time payment order
    pub async fn create_order(&self, request: &CreateOrder) -> Result<Order> {
        if request.amount == 0 {
            return Err(GatewayError::Validation(
                "Amount must be a positive integer in minor units".into(),
            ));
        }

        tracing::info!(
            amount = request.amount,
            currency = %request.currency,
            "Creating Razorpay order"
        );

        let order: Order = self.post("orders", request, "Failed to create order").await?;

        tracing::info!(
            order_id = %order.id,
            receipt = ?order.receipt,
            status = ?order.status,
            "Razorpay order created"
        );
        Ok(order)
    }

    /// Create a recurring subscription against an existing plan
    pub async fn create_subscription(&self, request: &CreateSubscription) -> Result<Subscription> {
        if request.plan_id.trim().is_empty() {
            return Err(GatewayError::Validation("Plan ID is required".into()));
        }

        tracing::info!(plan_id = %request.plan_id, "Creating Razorpay subscription");

        let subscription: Subscription = self
            .post("subscriptions", request, "Failed to create subscription")
            .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            status = %subscription.status,
            "Razorpay subscription created"
        );
        Ok(subscription)
    }

    /// Check the signature the widget returned for a completed checkout
    pub fn verify_signature(
        &self,
        intent: SignedIntent<'_>,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        signature::verify(&self.config.key_secret, intent, payment_id, signature)
    }

    async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.api_base, path);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let envelope: VendorErrorEnvelope = serde_json::from_slice(&bytes).unwrap_or_default();
            let (code, description) = envelope
                .error
                .map(|e| (e.code, e.description))
                .unwrap_or_default();

            tracing::error!(
                status = status.as_u16(),
                code = ?code,
                description = ?description,
                "Razorpay API error"
            );

            return Err(GatewayError::Vendor {
                status: status.as_u16(),
                message: description.unwrap_or_else(|| fallback.to_string()),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
