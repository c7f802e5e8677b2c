//! Purchase requests
//!
//! A purchase is either a one-time payment (an amount) or a recurring
//! subscription (a plan). [`PurchaseRequest`] is a sum of the two, so a
//! request can never carry both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Currency used when a payment does not name one
pub const DEFAULT_CURRENCY: &str = "INR";

/// Opaque key/value notes, passed through every layer unchanged
pub type Notes = BTreeMap<String, String>;

/// Contact details pre-filled in the widget
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// What the widget shows, shared by both purchase kinds
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Merchant name shown in the widget header
    pub name: String,
    pub description: Option<String>,
    pub prefill: Prefill,
    pub notes: Notes,
}

/// One-time payment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor currency units (paise for INR)
    pub amount: u64,
    pub currency: Option<String>,
    pub details: CheckoutDetails,
}

impl PaymentRequest {
    pub fn new(amount: u64, name: impl Into<String>) -> Self {
        Self {
            amount,
            currency: None,
            details: CheckoutDetails {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.details.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn prefill(mut self, prefill: Prefill) -> Self {
        self.details.prefill = prefill;
        self
    }

    #[must_use]
    pub fn note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.notes.insert(key.into(), value.into());
        self
    }

    /// Currency actually charged
    pub fn effective_currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Recurring subscription against a vendor plan
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub plan_id: String,
    /// Number of billing cycles; vendor default when `None`
    pub total_count: Option<u32>,
    pub details: CheckoutDetails,
}

impl SubscriptionRequest {
    pub fn new(plan_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            total_count: None,
            details: CheckoutDetails {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn total_count(mut self, total_count: u32) -> Self {
        self.total_count = Some(total_count);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.details.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn prefill(mut self, prefill: Prefill) -> Self {
        self.details.prefill = prefill;
        self
    }

    #[must_use]
    pub fn note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.notes.insert(key.into(), value.into());
        self
    }
}

/// Either kind of purchase
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PurchaseRequest {
    Payment(PaymentRequest),
    Subscription(SubscriptionRequest),
}

impl PurchaseRequest {
    pub const fn kind(&self) -> PurchaseKind {
        match self {
            PurchaseRequest::Payment(_) => PurchaseKind::Payment,
            PurchaseRequest::Subscription(_) => PurchaseKind::Subscription,
        }
    }

    pub const fn details(&self) -> &CheckoutDetails {
        match self {
            PurchaseRequest::Payment(p) => &p.details,
            PurchaseRequest::Subscription(s) => &s.details,
        }
    }
}

impl From<PaymentRequest> for PurchaseRequest {
    fn from(request: PaymentRequest) -> Self {
        PurchaseRequest::Payment(request)
    }
}

impl From<SubscriptionRequest> for PurchaseRequest {
    fn from(request: SubscriptionRequest) -> Self {
        PurchaseRequest::Subscription(request)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseKind {
    Payment,
    Subscription,
}

impl PurchaseKind {
    /// Toast shown once the purchase is confirmed
    pub const fn success_message(self) -> &'static str {
        match self {
            PurchaseKind::Payment => "Payment successful!",
            PurchaseKind::Subscription => "Subscription activated!",
        }
    }

    /// Toast shown when the purchase never reached the widget
    pub const fn initiation_failed_message(self) -> &'static str {
        match self {
            PurchaseKind::Payment => "Failed to initiate payment",
            PurchaseKind::Subscription => "Failed to initiate subscription",
        }
    }
}
