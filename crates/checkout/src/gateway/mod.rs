//! Payment gateway integration.
//!
//! Two concerns live here, deliberately separated:
//!
//! - [`bootstrap`] - getting the gateway's SDK loaded exactly once per page
//!   and exposing an awaitable readiness signal
//! - [`handoff`] - handing one checkout attempt to the gateway UI with the
//!   server-authoritative amount, and completing or unwinding on its
//!   callbacks
//!
//! The gateway itself is opaque: this crate configures it, launches it, and
//! consumes exactly one of its two callbacks. Declines and retries inside
//! the gateway UI never surface here.

pub mod bootstrap;
pub mod handoff;

pub use bootstrap::{
    GatewayBootstrapper, GatewayLoadError, SdkHandle, SdkLoader, SdkReadiness, SdkSlot, SdkState,
};
pub use handoff::{
    ChargeLineItem, CheckoutRedirect, GatewayCharge, GatewayOutcome, GatewayReceipt,
    GatewaySession, HandoffError, HandoffOutcome, PaymentHandoff, PaymentSessionState,
};
