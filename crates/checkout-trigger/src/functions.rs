//! HTTP client for the checkout backend functions

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::backend::{
    CreateOrderBody, CreateSubscriptionBody, OrderCreated, OrderIssuer, PaymentVerifier,
    SubscriptionCreated, VerifyResponse,
};
use crate::error::{Result, TriggerError};
use crate::widget::CallbackPayload;

pub const CREATE_ORDER_FUNCTION: &str = "create-razorpay-order";
pub const CREATE_SUBSCRIPTION_FUNCTION: &str = "create-razorpay-subscription";
pub const VERIFY_PAYMENT_FUNCTION: &str = "verify-razorpay-payment";

/// Where the backend functions live
#[derive(Clone, Debug)]
pub struct FunctionsConfig {
    /// Base URL; functions are served under `{base_url}/functions/v1/`
    pub base_url: String,

    /// Public (anon) key sent as `apikey` and bearer token
    pub api_key: Option<String>,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            api_key: None,
        }
    }
}

impl FunctionsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Create from `CHECKOUT_FUNCTIONS_URL` and `CHECKOUT_FUNCTIONS_KEY`
    pub fn from_env() -> Self {
        let base = std::env::var("CHECKOUT_FUNCTIONS_URL")
            .map_or_else(|_| Self::default(), Self::new);

        Self {
            api_key: std::env::var("CHECKOUT_FUNCTIONS_KEY").ok().filter(|k| !k.is_empty()),
            ..base
        }
    }
}

/// Calls the issuer and verifier functions over HTTP
pub struct FunctionsClient {
    http: reqwest::Client,
    config: FunctionsConfig,
}

impl FunctionsClient {
    pub fn new(config: FunctionsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(FunctionsConfig::from_env())
    }

    /// Invoke a function with a JSON body
    ///
    /// An `error` string in the response body wins over the HTTP status, so
    /// the caller sees the backend's own message.
    pub async fn invoke<B, T>(&self, function: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/functions/v1/{}", self.config.base_url, function);

        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        if let Some(message) = data.get("error").and_then(Value::as_str) {
            tracing::warn!(
                function,
                status = status.as_u16(),
                error = message,
                "Function returned an error"
            );
            return Err(TriggerError::Issuer(message.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(
                function,
                status = status.as_u16(),
                "Function returned a non-2xx status"
            );
            return Err(TriggerError::Transport(format!(
                "Function {function} returned status {status}"
            )));
        }

        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl OrderIssuer for FunctionsClient {
    async fn create_order(&self, body: &CreateOrderBody) -> Result<OrderCreated> {
        self.invoke(CREATE_ORDER_FUNCTION, body).await
    }

    async fn create_subscription(
        &self,
        body: &CreateSubscriptionBody,
    ) -> Result<SubscriptionCreated> {
        self.invoke(CREATE_SUBSCRIPTION_FUNCTION, body).await
    }
}

#[async_trait]
impl PaymentVerifier for FunctionsClient {
    async fn verify(&self, payload: &CallbackPayload) -> Result<bool> {
        let response: VerifyResponse = self.invoke(VERIFY_PAYMENT_FUNCTION, payload).await?;
        Ok(response.verified)
    }
}
