//! Razorpay wire types
//!
//! Only the fields this service forwards are modelled. Everything else the
//! vendor returns (payment instruments, customer records) is dropped on
//! deserialization and never reaches a caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form notes attached to orders and subscriptions
pub type Notes = BTreeMap<String, String>;

/// `POST /orders` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateOrder {
    /// Amount in minor currency units (paise for INR)
    pub amount: u64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    pub notes: Notes,
}

impl CreateOrder {
    pub fn new(amount: u64, currency: impl Into<String>, notes: Notes) -> Self {
        Self {
            amount,
            currency: currency.into(),
            receipt: None,
            notes,
        }
    }

    /// Attach a freshly generated receipt reference
    #[must_use]
    pub fn with_generated_receipt(mut self) -> Self {
        self.receipt = Some(format!("rcpt_{}", uuid::Uuid::new_v4().simple()));
        self
    }
}

/// Order as returned by the vendor
#[derive(Clone, Debug, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `POST /subscriptions` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateSubscription {
    pub plan_id: String,
    pub customer_notify: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    pub notes: Notes,
}

/// Subscription as returned by the vendor
#[derive(Clone, Debug, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub short_url: Option<String>,
}

/// Error envelope used by every vendor endpoint
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VendorErrorEnvelope {
    #[serde(default)]
    pub error: Option<VendorError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
