//! # checkout-trigger
//!
//! Client side of the Razorpay checkout flow. A [`PaymentTrigger`] takes a
//! purchase description, loads the vendor script once, asks the backend
//! for an intent, opens the hosted widget and has the backend verify the
//! signed result before reporting success.
//!
//! ## Seams
//!
//! | trait               | production implementation              |
//! |---------------------|----------------------------------------|
//! | [`ScriptHost`]      | the page (script tag + global check)   |
//! | [`CheckoutWidget`]  | the vendor widget, via [`WidgetSlot`]  |
//! | [`OrderIssuer`]     | [`FunctionsClient`]                    |
//! | [`PaymentVerifier`] | [`FunctionsClient`]                    |
//! | [`Notifier`]        | toasts; [`TracingNotifier`] logs them  |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_trigger::{Callbacks, FunctionsClient, PaymentRequest, PaymentTrigger};
//!
//! let trigger = PaymentTrigger::new(host, Arc::new(FunctionsClient::from_env()), widget);
//!
//! trigger
//!     .initiate_payment(
//!         PaymentRequest::new(50_000, "Acme Tech").description("Website audit"),
//!         Callbacks::new()
//!             .on_success(|payment| tracing::info!(id = %payment.razorpay_payment_id, "paid"))
//!             .on_error(|err| tracing::warn!(%err, "payment failed")),
//!     )
//!     .await;
//! ```

pub mod backend;
mod error;
pub mod functions;
mod notify;
mod request;
pub mod script;
mod trigger;
pub mod widget;

pub use backend::{OrderIssuer, PaymentVerifier};
pub use error::{Result, TriggerError};
pub use functions::{FunctionsClient, FunctionsConfig};
pub use notify::{Notifier, TracingNotifier};
pub use request::{
    CheckoutDetails, DEFAULT_CURRENCY, Notes, PaymentRequest, Prefill, PurchaseKind,
    PurchaseRequest, SubscriptionRequest,
};
pub use script::{CHECKOUT_SCRIPT_URL, ScriptGate, ScriptHost};
pub use trigger::{Callbacks, CheckoutOutcome, CheckoutPhase, PaymentTrigger};
pub use widget::{
    CallbackPayload, CheckoutOptions, CheckoutWidget, IntentId, PaymentIntent, WidgetOutcome,
    WidgetSlot, WidgetWait,
};
