//! Vendor script loading
//!
//! The checkout widget lives in a script served by the vendor. It must be
//! injected at most once per process, even when several purchase attempts
//! start at the same time (a double-clicked "Pay" button).
//!
//! ```text
//!   attempt A ──┐
//!               ├──▶ ScriptGate ──▶ one shared load future ──▶ ScriptHost::inject
//!   attempt B ──┘        │
//!                        └── loaded once: every later call returns immediately
//! ```
//!
//! A failed load is forgotten, so the next user action tries again.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

/// Where the vendor serves its checkout script
pub const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// The page environment the script is loaded into
#[async_trait]
pub trait ScriptHost: Send + Sync {
    /// Whether the vendor's global constructor is already defined
    fn is_present(&self) -> bool;

    /// Append a script element for `src` and wait for its load or error event
    async fn inject(&self, src: &str) -> bool;
}

type LoadFuture = Shared<BoxFuture<'static, bool>>;

/// Single-flight guard around the script load
#[derive(Default)]
pub struct ScriptGate {
    load: Mutex<Option<LoadFuture>>,
}

static GLOBAL_GATE: LazyLock<Arc<ScriptGate>> = LazyLock::new(|| Arc::new(ScriptGate::new()));

impl ScriptGate {
    pub const fn new() -> Self {
        Self {
            load: Mutex::new(None),
        }
    }

    /// Process-wide gate shared by every trigger that does not bring its own
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_GATE)
    }

    /// Whether a load has completed successfully
    pub fn is_loaded(&self) -> bool {
        self.slot()
            .as_ref()
            .and_then(Shared::peek)
            .copied()
            .unwrap_or(false)
    }

    /// Make sure the script is available, joining a load already in flight
    pub async fn ensure_loaded(&self, host: Arc<dyn ScriptHost>) -> bool {
        let load = {
            let mut slot = self.slot();
            let pending_or_loaded = slot
                .as_ref()
                .filter(|load| load.peek() != Some(&false))
                .cloned();

            match pending_or_loaded {
                Some(load) => load,
                None => {
                    let load = Self::start(host);
                    *slot = Some(load.clone());
                    load
                }
            }
        };

        load.await
    }

    fn start(host: Arc<dyn ScriptHost>) -> LoadFuture {
        async move {
            if host.is_present() {
                return true;
            }

            tracing::debug!(src = CHECKOUT_SCRIPT_URL, "Injecting checkout script");
            let loaded = host.inject(CHECKOUT_SCRIPT_URL).await;

            if loaded {
                tracing::info!("Checkout script loaded");
            } else {
                tracing::warn!(src = CHECKOUT_SCRIPT_URL, "Checkout script failed to load");
            }
            loaded
        }
        .boxed()
        .shared()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<LoadFuture>> {
        self.load.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
