//! Unified error handling.
//!
//! Every component converts its network-originating failures into its own
//! error kind at the boundary where the call was issued; `CheckoutError`
//! unifies those kinds for embedders that want a single error type. No raw
//! transport error crosses this crate's surface.
//!
//! A shopper closing the gateway is not represented here - cancellation is
//! an outcome ([`HandoffOutcome::Cancelled`](crate::gateway::HandoffOutcome)),
//! not an error.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::{GatewayLoadError, HandoffError};
use crate::order::InitError;
use crate::verify::VerifyTransportError;

/// Top-level error type for the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The gateway SDK could not be loaded.
    #[error("gateway load error: {0}")]
    GatewayLoad(#[from] GatewayLoadError),

    /// Order initialization was refused or unreachable.
    #[error("order initialization error: {0}")]
    Init(#[from] InitError),

    /// A payment handoff precondition was unmet.
    #[error("payment handoff error: {0}")]
    Handoff(#[from] HandoffError),

    /// Verification failed at the transport level.
    #[error("verification error: {0}")]
    Verify(#[from] VerifyTransportError),
}

impl CheckoutError {
    /// Remediation copy for the shopper: a concrete next action per kind.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::Config(_) => "Payments are misconfigured on our side. Please contact support.",
            Self::GatewayLoad(e) => e.remediation(),
            Self::Init(e) => e.remediation(),
            Self::Handoff(e) => e.remediation(),
            Self::Verify(e) => e.remediation(),
        }
    }
}

/// Result type alias for `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;
