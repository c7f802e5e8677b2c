//! Issuer and Verifier seams
//!
//! The trigger never talks to Razorpay's REST API. It asks a backend that
//! holds the credentials to create intents and to check signatures. The
//! wire shapes below are what the backend functions accept and return.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::{Notes, PaymentRequest, SubscriptionRequest};
use crate::widget::CallbackPayload;

/// Body for the "create order" function
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateOrderBody {
    pub amount: u64,
    pub currency: String,
    pub notes: Notes,
}

impl From<&PaymentRequest> for CreateOrderBody {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            amount: request.amount,
            currency: request.effective_currency().to_string(),
            notes: request.details.notes.clone(),
        }
    }
}

/// Body for the "create subscription" function
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateSubscriptionBody {
    pub plan_id: String,
    pub customer_notify: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    pub notes: Notes,
}

impl From<&SubscriptionRequest> for CreateSubscriptionBody {
    fn from(request: &SubscriptionRequest) -> Self {
        Self {
            plan_id: request.plan_id.clone(),
            customer_notify: 1,
            total_count: request.total_count,
            notes: request.details.notes.clone(),
        }
    }
}

/// Order intent returned by the issuer
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub key_id: String,
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
}

/// Subscription intent returned by the issuer
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreated {
    pub key_id: String,
    pub subscription_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// Creates payment intents with the vendor
#[async_trait]
pub trait OrderIssuer: Send + Sync {
    async fn create_order(&self, body: &CreateOrderBody) -> Result<OrderCreated>;

    async fn create_subscription(
        &self,
        body: &CreateSubscriptionBody,
    ) -> Result<SubscriptionCreated>;
}

/// Confirms a completed checkout's signature
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// `Ok(false)` means the backend answered but did not confirm the payment
    async fn verify(&self, payload: &CallbackPayload) -> Result<bool>;
}
