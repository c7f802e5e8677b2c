// HTTP-level tests for the checkout endpoints
//
// Requests go through the full router with tower::ServiceExt::oneshot. The
// Razorpay REST API is replaced by a small axum app bound to a local port.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    routing::post,
};
use checkout_gateway::{GatewayConfig, RazorpayClient, SignedIntent, signature};
use checkout_server::{
    AppState, CREATE_ORDER_PATH, CREATE_SUBSCRIPTION_PATH, VERIFY_PAYMENT_PATH, router,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const KEY_ID: &str = "rzp_test_key";
const KEY_SECRET: &str = "test_secret";

// ─── Fake vendor ─────────────────────────────────────────────────

#[derive(Clone, Default)]
struct VendorLog {
    requests: Arc<Mutex<Vec<(String, Value, Option<String>)>>>,
}

impl VendorLog {
    fn last(&self) -> (String, Value, Option<String>) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn record(log: &VendorLog, path: &str, headers: &HeaderMap, body: &Value) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.requests
        .lock()
        .unwrap()
        .push((path.to_string(), body.clone(), auth));
}

async fn fake_orders(
    State(log): State<VendorLog>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(&log, "/orders", &headers, &body);
    Json(json!({
        "id": "order_test_1",
        "entity": "order",
        "amount": body["amount"],
        "currency": body["currency"],
        "receipt": body["receipt"],
        "status": "created"
    }))
}

async fn fake_subscriptions(
    State(log): State<VendorLog>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&log, "/subscriptions", &headers, &body);

    if body["plan_id"] == "plan_outage" {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null));
    }

    if body["plan_id"] == "plan_unknown" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "The id provided does not exist"
                }
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "sub_test_1",
            "entity": "subscription",
            "plan_id": body["plan_id"],
            "status": "created",
            "short_url": "https://rzp.io/i/test"
        })),
    )
}

async fn spawn_vendor() -> (String, VendorLog) {
    let log = VendorLog::default();
    let app = Router::new()
        .route("/orders", post(fake_orders))
        .route("/subscriptions", post(fake_subscriptions))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), log)
}

fn app_against(base: &str) -> Router {
    let client = RazorpayClient::new(GatewayConfig::new(KEY_ID, KEY_SECRET).with_api_base(base));
    router(AppState::new(Some(client)))
}

async fn configured_app() -> (Router, VendorLog) {
    let (base, log) = spawn_vendor().await;
    (app_against(&base), log)
}

fn unconfigured_app() -> Router {
    router(AppState::new(None))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

// ─── Issuer: orders ──────────────────────────────────────────────

#[tokio::test]
async fn create_order_defaults_currency_and_notes() {
    let (app, log) = configured_app().await;

    let (status, headers, body) =
        send(app, post_json(CREATE_ORDER_PATH, &json!({"amount": 50000}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        body,
        json!({"keyId": KEY_ID, "amount": 50000, "currency": "INR", "orderId": "order_test_1"})
    );

    let (path, sent, auth) = log.last();
    assert_eq!(path, "/orders");
    assert_eq!(sent["amount"], 50000);
    assert_eq!(sent["currency"], "INR");
    assert_eq!(sent["notes"], json!({}));
    assert!(sent["receipt"].as_str().unwrap().starts_with("rcpt_"));
    assert!(auth.unwrap().starts_with("Basic "));
}

#[tokio::test]
async fn create_order_passes_notes_verbatim() {
    let (app, log) = configured_app().await;

    let request = json!({
        "amount": 120000,
        "currency": "USD",
        "notes": {"plan": "Growth", "source": "solutions-page"}
    });
    let (status, _, body) = send(app, post_json(CREATE_ORDER_PATH, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "USD");

    let (_, sent, _) = log.last();
    assert_eq!(sent["notes"], json!({"plan": "Growth", "source": "solutions-page"}));
}

#[tokio::test]
async fn create_order_rejects_non_positive_amount() {
    let (app, log) = configured_app().await;

    for amount in [json!(0), json!(-5), json!(10.5), json!("500")] {
        let (status, _, body) = send(
            app.clone(),
            post_json(CREATE_ORDER_PATH, &json!({"amount": amount})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount must be a positive integer in minor units");
    }

    assert_eq!(log.count(), 0);
}

#[tokio::test]
async fn create_order_without_credentials_is_server_error() {
    let (status, _, body) = send(
        unconfigured_app(),
        post_json(CREATE_ORDER_PATH, &json!({"amount": 50000})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Payment gateway not configured"}));
}

#[tokio::test]
async fn malformed_body_is_reported_as_json_error() {
    let (app, _) = configured_app().await;

    let request = Request::builder()
        .method("POST")
        .uri(CREATE_ORDER_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrongly_typed_fields_are_validation_errors() {
    let (app, log) = configured_app().await;

    let cases = [
        (CREATE_SUBSCRIPTION_PATH, json!({"plan_id": "plan_1", "total_count": -1})),
        (CREATE_SUBSCRIPTION_PATH, json!({"plan_id": 123})),
        (CREATE_ORDER_PATH, json!({"amount": 50000, "notes": {"qty": 2}})),
        (
            VERIFY_PAYMENT_PATH,
            json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": 7,
                "razorpay_signature": "abc"
            }),
        ),
    ];

    for (path, request) in cases {
        let (status, _, body) = send(app.clone(), post_json(path, &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {request}");
        assert!(body["error"].is_string());
    }

    assert_eq!(log.count(), 0);
}

#[tokio::test]
async fn unreachable_vendor_hides_transport_details() {
    let app = app_against("http://127.0.0.1:1");

    let (status, _, body) =
        send(app, post_json(CREATE_ORDER_PATH, &json!({"amount": 50000}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Payment gateway unreachable. Please try again."}));
}

// ─── Issuer: subscriptions ───────────────────────────────────────

#[tokio::test]
async fn create_subscription_forwards_plan() {
    let (app, log) = configured_app().await;

    let request =
        json!({"plan_id": "plan_123", "customer_notify": 1, "total_count": 12, "notes": {}});
    let (status, _, body) = send(app, post_json(CREATE_SUBSCRIPTION_PATH, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "subscriptionId": "sub_test_1",
            "status": "created",
            "shortUrl": "https://rzp.io/i/test",
            "keyId": KEY_ID
        })
    );

    let (path, sent, _) = log.last();
    assert_eq!(path, "/subscriptions");
    assert_eq!(
        sent,
        json!({"plan_id": "plan_123", "customer_notify": 1, "total_count": 12, "notes": {}})
    );
}

#[tokio::test]
async fn create_subscription_defaults_notify_and_omits_count() {
    let (app, log) = configured_app().await;

    let (status, _, _) = send(
        app,
        post_json(CREATE_SUBSCRIPTION_PATH, &json!({"plan_id": "plan_123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let (_, sent, _) = log.last();
    assert_eq!(sent, json!({"plan_id": "plan_123", "customer_notify": 1, "notes": {}}));
}

#[tokio::test]
async fn create_subscription_drops_zero_total_count() {
    let (app, log) = configured_app().await;

    let (status, _, _) = send(
        app,
        post_json(CREATE_SUBSCRIPTION_PATH, &json!({"plan_id": "plan_123", "total_count": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let (_, sent, _) = log.last();
    assert!(sent.get("total_count").is_none());
    assert_eq!(sent["plan_id"], "plan_123");
}

#[tokio::test]
async fn create_subscription_requires_plan_id() {
    let (app, log) = configured_app().await;

    let (status, _, body) =
        send(app, post_json(CREATE_SUBSCRIPTION_PATH, &json!({"total_count": 3}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Plan ID is required"}));
    assert_eq!(log.count(), 0);
}

#[tokio::test]
async fn vendor_rejection_keeps_status_and_message() {
    let (app, _) = configured_app().await;

    let (status, _, body) = send(
        app,
        post_json(CREATE_SUBSCRIPTION_PATH, &json!({"plan_id": "plan_unknown"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "The id provided does not exist"}));
}

#[tokio::test]
async fn vendor_outage_without_description_uses_fallback() {
    let (app, _) = configured_app().await;

    let (status, _, body) = send(
        app,
        post_json(CREATE_SUBSCRIPTION_PATH, &json!({"plan_id": "plan_outage"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "Failed to create subscription"}));
}

// ─── Verifier ────────────────────────────────────────────────────

#[tokio::test]
async fn verify_accepts_valid_order_signature() {
    let (app, _) = configured_app().await;
    let sig = signature::sign(KEY_SECRET, SignedIntent::Order("order_test_1"), "pay_test_1");

    let request = json!({
        "razorpay_order_id": "order_test_1",
        "razorpay_payment_id": "pay_test_1",
        "razorpay_signature": sig
    });
    let (status, _, body) = send(app, post_json(VERIFY_PAYMENT_PATH, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"verified": true}));
}

#[tokio::test]
async fn verify_rejects_tampered_signature() {
    let (app, _) = configured_app().await;
    let sig = signature::sign(KEY_SECRET, SignedIntent::Order("order_test_1"), "pay_test_1");

    let request = json!({
        "razorpay_order_id": "order_test_2",
        "razorpay_payment_id": "pay_test_1",
        "razorpay_signature": sig
    });
    let (status, _, body) = send(app, post_json(VERIFY_PAYMENT_PATH, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"verified": false}));
}

#[tokio::test]
async fn verify_accepts_subscription_signature() {
    let (app, _) = configured_app().await;
    let sig = signature::sign(KEY_SECRET, SignedIntent::Subscription("sub_test_1"), "pay_test_9");

    let request = json!({
        "razorpay_subscription_id": "sub_test_1",
        "razorpay_payment_id": "pay_test_9",
        "razorpay_signature": sig
    });
    let (_, _, body) = send(app, post_json(VERIFY_PAYMENT_PATH, &request)).await;

    assert_eq!(body, json!({"verified": true}));
}

#[tokio::test]
async fn verify_requires_fields() {
    let (app, _) = configured_app().await;

    let (status, _, _) = send(
        app.clone(),
        post_json(VERIFY_PAYMENT_PATH, &json!({"razorpay_order_id": "order_1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        app,
        post_json(
            VERIFY_PAYMENT_PATH,
            &json!({"razorpay_payment_id": "pay_1", "razorpay_signature": "abc"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order ID or subscription ID is required");
}

#[tokio::test]
async fn verify_without_credentials_is_server_error() {
    let request = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": "abc"
    });
    let (status, _, body) =
        send(unconfigured_app(), post_json(VERIFY_PAYMENT_PATH, &request)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Payment gateway not configured");
}

// ─── CORS & health ───────────────────────────────────────────────

#[tokio::test]
async fn preflight_is_permissive() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri(CREATE_ORDER_PATH)
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        )
        .body(Body::empty())
        .unwrap();

    let response = unconfigured_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    for name in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(name), "missing {name} in {allowed}");
    }
}

#[tokio::test]
async fn actual_request_carries_allow_origin() {
    let mut request = post_json(CREATE_ORDER_PATH, &json!({"amount": 1}));
    request
        .headers_mut()
        .insert(header::ORIGIN, "https://example.com".parse().unwrap());

    let (_, headers, _) = send(unconfigured_app(), request).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn health_reports_gateway_configuration() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _, body) = send(unconfigured_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gateway_configured"], false);
}
