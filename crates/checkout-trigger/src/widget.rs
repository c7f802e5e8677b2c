//! Vendor checkout widget
//!
//! The hosted widget reports back through two callbacks: a completion
//! handler with signed payment data, or a dismiss hook when the user closes
//! it. [`WidgetSlot`] turns that pair into one future that resolves exactly
//! once, to whichever callback fired first.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::Result;
use crate::request::{CheckoutDetails, Notes, Prefill};

/// Brand color applied to the widget
pub const THEME_COLOR: &str = "#0f172a";

/// Signed data the widget hands back on completion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub razorpay_payment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_subscription_id: Option<String>,
    pub razorpay_signature: String,
}

/// What the widget is opened for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentId {
    Order(String),
    Subscription(String),
}

/// An intent created by the issuer, valid for one checkout attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntent {
    pub key_id: String,
    pub amount: u64,
    pub currency: String,
    pub id: IntentId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Options the widget is constructed with
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    pub prefill: Prefill,
    pub notes: Notes,
    pub theme: Theme,
}

impl CheckoutOptions {
    pub fn new(intent: PaymentIntent, details: &CheckoutDetails) -> Self {
        let (order_id, subscription_id) = match intent.id {
            IntentId::Order(id) => (Some(id), None),
            IntentId::Subscription(id) => (None, Some(id)),
        };

        Self {
            key: intent.key_id,
            amount: intent.amount,
            currency: intent.currency,
            name: details.name.clone(),
            description: details.description.clone(),
            order_id,
            subscription_id,
            prefill: details.prefill.clone(),
            notes: details.notes.clone(),
            theme: Theme {
                color: THEME_COLOR.into(),
            },
        }
    }
}

/// How the widget closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetOutcome {
    Completed(CallbackPayload),
    Dismissed,
}

/// The vendor's hosted checkout UI
#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    /// Show the widget and wait until it completes or is dismissed
    ///
    /// An error means the widget never opened.
    async fn open(&self, options: CheckoutOptions) -> Result<WidgetOutcome>;
}

/// Callback side of a single-resolution widget outcome
#[derive(Clone)]
pub struct WidgetSlot {
    sender: Arc<Mutex<Option<oneshot::Sender<WidgetOutcome>>>>,
}

/// Awaiting side of a [`WidgetSlot`]
pub struct WidgetWait {
    receiver: oneshot::Receiver<WidgetOutcome>,
}

impl WidgetSlot {
    pub fn new() -> (Self, WidgetWait) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Arc::new(Mutex::new(Some(sender))),
            },
            WidgetWait { receiver },
        )
    }

    /// Completion handler. Returns `false` if the outcome was already settled.
    pub fn complete(&self, payload: CallbackPayload) -> bool {
        self.resolve(WidgetOutcome::Completed(payload))
    }

    /// Dismiss hook. Returns `false` if the outcome was already settled.
    pub fn dismiss(&self) -> bool {
        self.resolve(WidgetOutcome::Dismissed)
    }

    fn resolve(&self, outcome: WidgetOutcome) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl WidgetWait {
    /// Wait for the first callback. A widget torn down without firing
    /// either callback counts as dismissed.
    pub async fn outcome(self) -> WidgetOutcome {
        self.receiver.await.unwrap_or(WidgetOutcome::Dismissed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CallbackPayload {
        CallbackPayload {
            razorpay_payment_id: "pay_1".into(),
            razorpay_order_id: Some("order_1".into()),
            razorpay_subscription_id: None,
            razorpay_signature: "sig".into(),
        }
    }

    #[tokio::test]
    async fn test_first_callback_wins() {
        let (slot, wait) = WidgetSlot::new();

        assert!(slot.complete(payload()));
        assert!(!slot.dismiss());
        assert!(!slot.clone().complete(payload()));

        assert_eq!(wait.outcome().await, WidgetOutcome::Completed(payload()));
    }

    #[tokio::test]
    async fn test_dismiss_then_complete_is_ignored() {
        let (slot, wait) = WidgetSlot::new();

        assert!(slot.dismiss());
        assert!(!slot.complete(payload()));

        assert_eq!(wait.outcome().await, WidgetOutcome::Dismissed);
    }

    #[tokio::test]
    async fn test_dropped_slot_counts_as_dismissed() {
        let (slot, wait) = WidgetSlot::new();
        drop(slot);
        assert_eq!(wait.outcome().await, WidgetOutcome::Dismissed);
    }

    #[test]
    fn test_options_for_subscription() {
        let intent = PaymentIntent {
            key_id: "rzp_test".into(),
            amount: 0,
            currency: "INR".into(),
            id: IntentId::Subscription("sub_1".into()),
        };
        let details = CheckoutDetails {
            name: "Acme Tech".into(),
            ..Default::default()
        };

        let options = CheckoutOptions::new(intent, &details);
        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["subscription_id"], "sub_1");
        assert!(json.get("order_id").is_none());
        assert_eq!(json["amount"], 0);
        assert_eq!(json["theme"]["color"], THEME_COLOR);
    }
}
