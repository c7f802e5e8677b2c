//! HTTP Handlers

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use checkout_gateway::{
    CreateOrder, CreateSubscription, GatewayError, Notes, RazorpayClient, SignedIntent,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, error::Category};

use crate::state::AppState;

/// Currency used when the caller does not name one
pub const DEFAULT_CURRENCY: &str = "INR";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub notes: Option<Notes>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub key_id: String,
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default = "default_customer_notify")]
    pub customer_notify: u8,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub notes: Option<Notes>,
}

const fn default_customer_notify() -> u8 {
    1
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subscription_id: String,
    pub status: String,
    pub short_url: Option<String>,
    pub key_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_subscription_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway_configured: state.gateway.is_some(),
    })
}

/// Create a one-time payment order
pub async fn create_order(State(state): State<AppState>, body: Bytes) -> ApiResult<OrderResponse> {
    let payload: CreateOrderRequest = parse_body(&body)?;
    let gateway = configured(&state)?;

    let amount = payload
        .amount
        .as_ref()
        .and_then(Value::as_u64)
        .filter(|amount| *amount > 0)
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "Amount must be a positive integer in minor units",
            )
        })?;

    let currency = payload
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.into());

    let request = CreateOrder::new(amount, currency, payload.notes.unwrap_or_default())
        .with_generated_receipt();

    let order = gateway.create_order(&request).await.map_err(gateway_failure)?;

    Ok(Json(OrderResponse {
        key_id: gateway.key_id().to_string(),
        amount: order.amount,
        currency: order.currency,
        order_id: order.id,
    }))
}

/// Create a recurring subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<SubscriptionResponse> {
    let payload: CreateSubscriptionRequest = parse_body(&body)?;
    let gateway = configured(&state)?;

    let plan_id = payload
        .plan_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Plan ID is required"))?;

    let request = CreateSubscription {
        plan_id,
        customer_notify: payload.customer_notify,
        total_count: payload.total_count.filter(|count| *count > 0),
        notes: payload.notes.unwrap_or_default(),
    };

    let subscription = gateway
        .create_subscription(&request)
        .await
        .map_err(gateway_failure)?;

    Ok(Json(SubscriptionResponse {
        subscription_id: subscription.id,
        status: subscription.status,
        short_url: subscription.short_url,
        key_id: gateway.key_id().to_string(),
    }))
}

/// Verify the signature of a completed checkout
pub async fn verify_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<VerifyResponse> {
    let VerifyPaymentRequest {
        razorpay_order_id,
        razorpay_subscription_id,
        razorpay_payment_id,
        razorpay_signature,
    } = parse_body::<VerifyPaymentRequest>(&body)?;
    let gateway = configured(&state)?;

    let (Some(payment_id), Some(signature)) = (
        razorpay_payment_id.filter(|id| !id.is_empty()),
        razorpay_signature.filter(|sig| !sig.is_empty()),
    ) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Payment ID and signature are required",
        ));
    };

    let intent = match (razorpay_order_id.as_deref(), razorpay_subscription_id.as_deref()) {
        (Some(order_id), _) if !order_id.is_empty() => SignedIntent::Order(order_id),
        (_, Some(subscription_id)) if !subscription_id.is_empty() => {
            SignedIntent::Subscription(subscription_id)
        }
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Order ID or subscription ID is required",
            ));
        }
    };

    let verified = gateway.verify_signature(intent, &payment_id, &signature);

    if verified {
        tracing::info!(payment_id = %payment_id, intent = ?intent, "Payment verified");
    } else {
        tracing::warn!(payment_id = %payment_id, intent = ?intent, "Payment signature mismatch");
    }

    Ok(Json(VerifyResponse { verified }))
}

// ============================================================================
// Helpers
// ============================================================================

fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Well-formed JSON with a wrongly typed field is the caller's fault (400);
/// a body that is not JSON at all answers 500.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => {
            tracing::warn!("Invalid request field: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Category::Syntax | Category::Eof | Category::Io => {
            tracing::error!("Unreadable request body: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })
}

fn configured(state: &AppState) -> Result<&RazorpayClient, (StatusCode, Json<ErrorResponse>)> {
    state.gateway.as_deref().ok_or_else(|| {
        tracing::error!("Razorpay credentials not configured");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotConfigured.to_string(),
        )
    })
}

fn gateway_failure(err: GatewayError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_client_error() {
        tracing::warn!(status = status.as_u16(), "Gateway rejected request: {}", err);
    } else {
        tracing::error!(status = status.as_u16(), "Gateway error: {}", err);
    }

    error_response(status, err.user_message())
}
