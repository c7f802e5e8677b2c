//! Checkout signature verification
//!
//! Razorpay signs every completed checkout with HMAC-SHA256 keyed by the
//! account's key secret. The signed message depends on what was paid for:
//!
//! - orders: `"{order_id}|{payment_id}"`
//! - subscriptions: `"{payment_id}|{subscription_id}"`

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// The intent a checkout signature is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignedIntent<'a> {
    Order(&'a str),
    Subscription(&'a str),
}

impl SignedIntent<'_> {
    /// Message the vendor signs for this intent and payment
    pub fn message(&self, payment_id: &str) -> String {
        match self {
            SignedIntent::Order(order_id) => format!("{order_id}|{payment_id}"),
            SignedIntent::Subscription(subscription_id) => {
                format!("{payment_id}|{subscription_id}")
            }
        }
    }
}

/// Compute the hex signature the vendor would send for this payment
pub fn sign(key_secret: &str, intent: SignedIntent<'_>, payment_id: &str) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts keys of any length")
    };
    mac.update(intent.message(payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a checkout signature in constant time
pub fn verify(
    key_secret: &str,
    intent: SignedIntent<'_>,
    payment_id: &str,
    signature: &str,
) -> bool {
    let expected = sign(key_secret, intent, payment_id);
    expected.as_bytes().ct_eq(signature.trim().as_bytes()).into()
}
