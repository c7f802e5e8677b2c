//! Payment trigger
//!
//! Drives one purchase attempt from click to confirmed payment:
//!
//! ```text
//! Idle ─▶ LoadingScript ─▶ CreatingIntent ─▶ WidgetOpen ─▶ Verifying ─▶ Succeeded
//!             │                │                 │             │
//!             └────────────────┴──────┐          │             └────▶ Failed
//!                                     ▼          └─(dismissed)──────▶ Cancelled
//!                                   Failed
//! ```
//!
//! The trigger keeps no state between attempts apart from the shared
//! [`ScriptGate`] and the busy signal.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::{CreateOrderBody, CreateSubscriptionBody, OrderIssuer, PaymentVerifier};
use crate::error::{Result, TriggerError};
use crate::notify::{Notifier, TracingNotifier};
use crate::request::{PaymentRequest, PurchaseKind, PurchaseRequest, SubscriptionRequest};
use crate::script::{ScriptGate, ScriptHost};
use crate::widget::{
    CallbackPayload, CheckoutOptions, CheckoutWidget, IntentId, PaymentIntent, WidgetOutcome,
};

/// Where the latest attempt currently stands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    LoadingScript,
    CreatingIntent,
    WidgetOpen,
    Verifying,
    Succeeded,
    Failed,
    Cancelled,
}

/// Final state of one attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Succeeded(CallbackPayload),
    Failed(TriggerError),
    /// The user closed the widget; no callback fired
    Cancelled,
}

impl CheckoutOutcome {
    const fn phase(&self) -> CheckoutPhase {
        match self {
            CheckoutOutcome::Succeeded(_) => CheckoutPhase::Succeeded,
            CheckoutOutcome::Failed(_) => CheckoutPhase::Failed,
            CheckoutOutcome::Cancelled => CheckoutPhase::Cancelled,
        }
    }
}

type SuccessCallback = Box<dyn FnOnce(CallbackPayload) + Send>;
type ErrorCallback = Box<dyn FnOnce(TriggerError) + Send>;

/// Result callbacks for one attempt; at most one of them fires
#[derive(Default)]
pub struct Callbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce(CallbackPayload) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(TriggerError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    fn succeed(self, payload: CallbackPayload) {
        if let Some(f) = self.on_success {
            f(payload);
        }
    }

    fn fail(self, err: TriggerError) {
        if let Some(f) = self.on_error {
            f(err);
        }
    }
}

/// Orchestrates purchase attempts against the vendor widget
pub struct PaymentTrigger {
    gate: Arc<ScriptGate>,
    host: Arc<dyn ScriptHost>,
    issuer: Arc<dyn OrderIssuer>,
    verifier: Arc<dyn PaymentVerifier>,
    widget: Arc<dyn CheckoutWidget>,
    notifier: Arc<dyn Notifier>,
    /// Number of attempts in flight; busy while non-zero
    active: watch::Sender<usize>,
    busy: watch::Sender<bool>,
    phase: watch::Sender<CheckoutPhase>,
}

impl PaymentTrigger {
    /// Create a trigger using the process-wide script gate and log-only toasts
    pub fn new<B>(
        host: Arc<dyn ScriptHost>,
        backend: Arc<B>,
        widget: Arc<dyn CheckoutWidget>,
    ) -> Self
    where
        B: OrderIssuer + PaymentVerifier + 'static,
    {
        Self {
            gate: ScriptGate::global(),
            host,
            issuer: backend.clone(),
            verifier: backend,
            widget,
            notifier: Arc::new(TracingNotifier),
            active: watch::Sender::new(0),
            busy: watch::Sender::new(false),
            phase: watch::Sender::new(CheckoutPhase::Idle),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use a dedicated script gate instead of the process-wide one
    #[must_use]
    pub fn with_script_gate(mut self, gate: Arc<ScriptGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Whether any attempt is in progress
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Watch the busy signal
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Phase of the most recent attempt
    pub fn phase(&self) -> CheckoutPhase {
        *self.phase.borrow()
    }

    /// Run a one-time payment
    pub async fn initiate_payment(
        &self,
        request: PaymentRequest,
        callbacks: Callbacks,
    ) -> CheckoutOutcome {
        self.initiate(PurchaseRequest::Payment(request), callbacks).await
    }

    /// Run a subscription checkout
    pub async fn initiate_subscription(
        &self,
        request: SubscriptionRequest,
        callbacks: Callbacks,
    ) -> CheckoutOutcome {
        self.initiate(PurchaseRequest::Subscription(request), callbacks).await
    }

    /// Run either kind of purchase
    pub async fn initiate(
        &self,
        request: PurchaseRequest,
        callbacks: Callbacks,
    ) -> CheckoutOutcome {
        let _busy = BusyGuard::enter(self);
        let kind = request.kind();

        let outcome = match self.prepare(&request).await {
            Ok(options) => self.checkout(kind, options, callbacks).await,
            Err(err) => {
                tracing::warn!(kind = ?kind, error = %err, "Checkout initiation failed");
                self.notifier.error(kind.initiation_failed_message());
                callbacks.fail(err.clone());
                CheckoutOutcome::Failed(err)
            }
        };

        self.set_phase(outcome.phase());
        outcome
    }

    /// Everything up to the widget: script, intent, widget options
    async fn prepare(&self, request: &PurchaseRequest) -> Result<CheckoutOptions> {
        if matches!(request, PurchaseRequest::Payment(payment) if payment.amount == 0) {
            return Err(TriggerError::InvalidAmount);
        }

        self.set_phase(CheckoutPhase::LoadingScript);
        if !self.gate.ensure_loaded(Arc::clone(&self.host)).await {
            return Err(TriggerError::GatewayUnavailable);
        }

        self.set_phase(CheckoutPhase::CreatingIntent);
        let intent = match request {
            PurchaseRequest::Payment(payment) => {
                let created = self
                    .issuer
                    .create_order(&CreateOrderBody::from(payment))
                    .await?;
                tracing::info!(
                    order_id = %created.order_id,
                    amount = created.amount,
                    "Order created"
                );
                PaymentIntent {
                    key_id: created.key_id,
                    amount: created.amount,
                    currency: created.currency,
                    id: IntentId::Order(created.order_id),
                }
            }
            PurchaseRequest::Subscription(subscription) => {
                let created = self
                    .issuer
                    .create_subscription(&CreateSubscriptionBody::from(subscription))
                    .await?;
                tracing::info!(subscription_id = %created.subscription_id, "Subscription created");
                // Billing is recurring and collected by the vendor
                PaymentIntent {
                    key_id: created.key_id,
                    amount: 0,
                    currency: crate::request::DEFAULT_CURRENCY.into(),
                    id: IntentId::Subscription(created.subscription_id),
                }
            }
        };

        Ok(CheckoutOptions::new(intent, request.details()))
    }

    /// Widget and verification
    async fn checkout(
        &self,
        kind: PurchaseKind,
        options: CheckoutOptions,
        callbacks: Callbacks,
    ) -> CheckoutOutcome {
        self.set_phase(CheckoutPhase::WidgetOpen);

        let payload = match self.widget.open(options).await {
            Ok(WidgetOutcome::Completed(payload)) => payload,
            Ok(WidgetOutcome::Dismissed) => {
                tracing::info!(kind = ?kind, "Checkout dismissed");
                return CheckoutOutcome::Cancelled;
            }
            Err(err) => {
                tracing::warn!(kind = ?kind, error = %err, "Checkout widget failed to open");
                self.notifier.error(kind.initiation_failed_message());
                callbacks.fail(err.clone());
                return CheckoutOutcome::Failed(err);
            }
        };

        self.set_phase(CheckoutPhase::Verifying);

        match self.verifier.verify(&payload).await {
            Ok(true) => {
                tracing::info!(payment_id = %payload.razorpay_payment_id, "Payment verified");
                self.notifier.success(kind.success_message());
                callbacks.succeed(payload.clone());
                CheckoutOutcome::Succeeded(payload)
            }
            result => {
                match result {
                    Ok(_) => tracing::warn!(
                        payment_id = %payload.razorpay_payment_id,
                        "Payment signature not verified"
                    ),
                    Err(err) => tracing::warn!(
                        payment_id = %payload.razorpay_payment_id,
                        error = %err,
                        "Payment verification request failed"
                    ),
                }
                // A charge may have gone through; the caller still sees a failure
                let err = TriggerError::VerificationFailed;
                self.notifier.error(err.user_message());
                callbacks.fail(err.clone());
                CheckoutOutcome::Failed(err)
            }
        }
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        tracing::debug!(phase = ?phase, "Checkout phase");
        self.phase.send_replace(phase);
    }
}

/// Holds the busy signal up while at least one attempt is running
///
/// The count and the flag change under the count's write lock, so an
/// attempt finishing never clears the flag after another one has raised it.
struct BusyGuard<'a> {
    trigger: &'a PaymentTrigger,
}

impl<'a> BusyGuard<'a> {
    fn enter(trigger: &'a PaymentTrigger) -> Self {
        trigger.active.send_modify(|active| {
            *active += 1;
            if *active == 1 {
                trigger.busy.send_replace(true);
            }
        });
        Self { trigger }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let busy = &self.trigger.busy;
        self.trigger.active.send_modify(|active| {
            *active = active.saturating_sub(1);
            if *active == 0 {
                busy.send_replace(false);
            }
        });
    }
}
