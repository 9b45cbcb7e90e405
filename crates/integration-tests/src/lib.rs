//! Integration tests for StagePass checkout.
//!
//! The tests drive the real flow components - intent builder, backend
//! client, payment handoff, verification poller - against scripted
//! collaborators: a `wiremock` backend where transport behavior matters, and
//! trait doubles for the cart, the gateway UI and multi-step verification
//! scripts (trait doubles compose with paused tokio time, which real sockets
//! do not).
//!
//! # Test Categories
//!
//! - `checkout_flow` - order initialization through gateway handoff
//! - `verification_flow` - post-redirect verification polling
//!
//! This crate's library is the shared scripted collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use stagepass_checkout::cart::CartStore;
use stagepass_checkout::gateway::{
    GatewayCharge, GatewayLoadError, GatewayOutcome, GatewayReceipt, GatewaySession, SdkHandle,
    SdkLoader,
};
use stagepass_checkout::verify::{VerifyBackend, VerifyResponse, VerifyTransportError};
use stagepass_core::{CartItem, Reference};

/// SDK loader that resolves immediately.
pub struct InstantLoader;

#[async_trait]
impl SdkLoader for InstantLoader {
    async fn load(&self) -> Result<SdkHandle, GatewayLoadError> {
        Ok(SdkHandle::new("https://js.gateway.test/v1/inline.js"))
    }
}

/// Cart double that counts `clear` invocations.
#[derive(Default)]
pub struct CountingCart {
    items: Mutex<Vec<CartItem>>,
    clears: AtomicU32,
}

impl CountingCart {
    #[must_use]
    pub fn with_items(items: Vec<CartItem>) -> Self {
        Self {
            items: Mutex::new(items),
            clears: AtomicU32::new(0),
        }
    }

    /// Number of times the flow cleared the cart.
    #[must_use]
    pub fn clears(&self) -> u32 {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CartStore for CountingCart {
    fn items(&self) -> Vec<CartItem> {
        self.items.lock().map_or_else(|_| Vec::new(), |items| items.clone())
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut items) = self.items.lock() {
            items.clear();
        }
    }
}

/// Gateway double that completes or cancels and records every charge.
pub struct ScriptedGateway {
    cancel: bool,
    launches: AtomicU32,
    charges: Mutex<Vec<GatewayCharge>>,
}

impl ScriptedGateway {
    /// A gateway whose success callback fires.
    #[must_use]
    pub fn completing() -> Self {
        Self {
            cancel: false,
            launches: AtomicU32::new(0),
            charges: Mutex::new(Vec::new()),
        }
    }

    /// A gateway the shopper closes.
    #[must_use]
    pub fn cancelling() -> Self {
        Self {
            cancel: true,
            launches: AtomicU32::new(0),
            charges: Mutex::new(Vec::new()),
        }
    }

    /// Number of gateway sessions opened.
    #[must_use]
    pub fn launches(&self) -> u32 {
        self.launches.load(Ordering::SeqCst)
    }

    /// Every charge configuration the gateway was launched with.
    #[must_use]
    pub fn charges(&self) -> Vec<GatewayCharge> {
        self.charges.lock().map_or_else(|_| Vec::new(), |charges| charges.clone())
    }
}

#[async_trait]
impl GatewaySession for ScriptedGateway {
    async fn launch(&self, charge: GatewayCharge) -> GatewayOutcome {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let reference = charge.reference.clone();
        if let Ok(mut charges) = self.charges.lock() {
            charges.push(charge);
        }

        if self.cancel {
            GatewayOutcome::Cancelled
        } else {
            GatewayOutcome::Completed(GatewayReceipt {
                reference,
                message: Some("Approved".to_string()),
            })
        }
    }
}

/// Verify backend that replays a fixed script of responses.
pub struct ScriptedVerifyBackend {
    script: Mutex<VecDeque<Result<VerifyResponse, VerifyTransportError>>>,
    calls: AtomicU32,
}

impl ScriptedVerifyBackend {
    #[must_use]
    pub fn new(script: Vec<Result<VerifyResponse, VerifyTransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        }
    }

    /// Number of verify calls issued.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerifyBackend for ScriptedVerifyBackend {
    async fn verify_by_reference(
        &self,
        _reference: &Reference,
    ) -> Result<VerifyResponse, VerifyTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .expect("poller called the backend more times than scripted")
    }
}

/// A one-line VIP cart.
#[must_use]
pub fn vip_cart() -> Vec<CartItem> {
    vec![CartItem {
        event_id: "E1".to_string(),
        tier_id: "T1".to_string(),
        tier_name: "VIP".to_string(),
        quantity: 2,
        max_quantity: 10,
    }]
}
