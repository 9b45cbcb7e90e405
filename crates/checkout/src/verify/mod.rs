//! Post-redirect payment verification.
//!
//! The gateway's success callback fires in the shopper's browser: it can be
//! spoofed, lost, or fire before settlement is durable server-side. Nothing
//! here trusts it. The confirmation view extracts the payment reference from
//! the redirect URL and asks the backend what actually happened, polling a
//! bounded number of times while the record settles.
//!
//! This flow is logically separate from the handoff that preceded it - it is
//! reached via a page redirect and shares no memory with the handoff;
//! correctness depends solely on the reference string.

mod poller;
pub mod redirect;

pub use poller::{
    PENDING_RETRY_DELAY, PENDING_RETRY_LIMIT, VerificationOutcome, VerificationPoller,
    VerificationState,
};
pub use redirect::{extract_reference, extract_status_hint};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use stagepass_core::{ChargeAmount, Reference};
use thiserror::Error;

/// Transport-level verification failures, each with a distinct meaning.
#[derive(Debug, Clone, Error)]
pub enum VerifyTransportError {
    /// HTTP 404: the payment record is not visible (yet).
    #[error("payment record not found")]
    NotFound,

    /// HTTP 400: the backend rejected the reference outright.
    #[error("verification rejected the reference")]
    BadRequest,

    /// Any other transport or decoding failure.
    #[error("verification failed: {0}")]
    Unknown(String),
}

impl VerifyTransportError {
    /// Remediation copy for the shopper.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::NotFound => "We can't see your payment yet. Refresh this page in a moment.",
            Self::BadRequest => {
                "We couldn't verify this payment. Contact support with your payment reference."
            }
            Self::Unknown(_) => "Verification hit a snag. Try again.",
        }
    }
}

/// Settlement status as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Success,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Payment details returned with a successful verification, retained for
/// the confirmation view. Deserialized leniently: the backend adds fields
/// over time and older clients must keep working.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationSummary {
    #[serde(default)]
    pub reference: Option<Reference>,
    #[serde(default, rename = "amount_minor_units")]
    pub amount: Option<ChargeAmount>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel: Option<String>,
}

/// The backend's verify-by-reference response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub status: VerifyStatus,
    #[serde(default)]
    pub data: Option<VerificationSummary>,
}

/// Read-only verify-by-reference access to the backend.
///
/// Safe to call repeatedly: once the backend record is finalized, the
/// classification it yields is stable no matter how many times or from how
/// many page loads it is read.
#[async_trait]
pub trait VerifyBackend: Send + Sync {
    /// Look up the payment outcome for `reference`.
    async fn verify_by_reference(
        &self,
        reference: &Reference,
    ) -> Result<VerifyResponse, VerifyTransportError>;
}
