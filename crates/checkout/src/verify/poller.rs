//! Bounded verification polling.

use std::sync::Arc;
use std::time::Duration;

use stagepass_core::Reference;
use tokio::sync::watch;
use tracing::instrument;
use url::Url;

use super::redirect::extract_reference;
use super::{VerifyBackend, VerifyStatus, VerifyTransportError, VerificationSummary};

/// Pending responses observed before polling freezes.
pub const PENDING_RETRY_LIMIT: u32 = 3;

/// Fixed delay between verification attempts. Deliberately non-exponential:
/// settlement latency is seconds, not minutes, and three spaced reads cover
/// it or nothing will.
pub const PENDING_RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Observable state of a verification run.
///
/// `Success`, `Failed`, `NotFound` and `Error` are terminal: no further
/// automatic network call occurs after reaching one. `Pending` is not
/// formally terminal but freezes once the retry budget is spent; progressing
/// out of it requires a manual refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    /// A verify call is in flight.
    Verifying,
    /// The backend has the record but settlement is not durable yet.
    Pending,
    /// Payment confirmed by the backend.
    Success,
    /// Payment failed, or the backend rejected the reference.
    Failed,
    /// The payment record is not visible to the backend.
    NotFound,
    /// Verification could not complete.
    Error,
}

impl VerificationState {
    /// Returns `true` for states that schedule no further automatic calls.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failed | Self::NotFound | Self::Error
        )
    }
}

/// How a verification run ended.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// Confirmed; the summary is retained for the confirmation view.
    Success(VerificationSummary),
    /// Still pending after the retry budget; a manual refresh (rerunning
    /// the poller) is the only way forward.
    StillPending,
    /// The payment failed or the reference was rejected.
    Failed,
    /// The record is not visible; likely a refresh-too-early.
    NotFound,
    /// Verification could not complete.
    Error(String),
}

impl VerificationOutcome {
    /// Remediation copy for the shopper.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::Success(_) => "You're in! Your tickets are on their way to your inbox.",
            Self::StillPending => {
                "Your payment is still settling. Refresh this page in a few seconds."
            }
            Self::Failed => {
                "This payment didn't go through. If you were charged, contact support with your payment reference."
            }
            Self::NotFound => "We can't see your payment yet. Refresh this page in a moment.",
            Self::Error(_) => "Verification hit a snag. Try again.",
        }
    }
}

/// Independently re-derives the payment outcome after the redirect.
///
/// The poller is constructed fresh on the confirmation view; it holds no
/// state from the handoff that preceded it. A run is a plain future -
/// dropping it (view teardown) cancels any scheduled retry, so no state
/// update can land on a defunct view.
pub struct VerificationPoller {
    backend: Arc<dyn VerifyBackend>,
    state_tx: watch::Sender<VerificationState>,
}

impl VerificationPoller {
    /// Create a poller over a verify backend.
    #[must_use]
    pub fn new(backend: Arc<dyn VerifyBackend>) -> Self {
        let (state_tx, _) = watch::channel(VerificationState::Verifying);
        Self { backend, state_tx }
    }

    /// Current state, read synchronously.
    #[must_use]
    pub fn state(&self) -> VerificationState {
        *self.state_tx.borrow()
    }

    /// Subscribe to state changes for rendering.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.state_tx.subscribe()
    }

    /// Verify the attempt named by a redirect URL.
    ///
    /// When no reference parameter is present the run ends in `Error`
    /// immediately, with zero network calls.
    #[instrument(skip(self, redirect_url))]
    pub async fn run_from_redirect(&self, redirect_url: &Url) -> VerificationOutcome {
        let Some(reference) = extract_reference(redirect_url) else {
            tracing::error!("confirmation redirect carried no payment reference");
            self.state_tx.send_replace(VerificationState::Error);
            return VerificationOutcome::Error("missing payment reference".to_string());
        };

        self.verify(&reference).await
    }

    /// Verify a known reference with bounded retries.
    ///
    /// Rerunning after [`VerificationOutcome::StillPending`] is the manual
    /// refresh affordance: verify-by-reference is idempotent, so a rerun is
    /// always safe.
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn verify(&self, reference: &Reference) -> VerificationOutcome {
        let mut pending_rounds: u32 = 0;

        loop {
            self.state_tx.send_replace(VerificationState::Verifying);

            match self.backend.verify_by_reference(reference).await {
                Ok(response) => match (response.status, response.data) {
                    (VerifyStatus::Success, Some(summary)) => {
                        tracing::info!("payment verified");
                        self.state_tx.send_replace(VerificationState::Success);
                        return VerificationOutcome::Success(summary);
                    }
                    (VerifyStatus::Pending, _) => {
                        pending_rounds += 1;
                        self.state_tx.send_replace(VerificationState::Pending);

                        if pending_rounds < PENDING_RETRY_LIMIT {
                            tracing::debug!(round = pending_rounds, "payment pending, will retry");
                            tokio::time::sleep(PENDING_RETRY_DELAY).await;
                            continue;
                        }

                        tracing::warn!("retry budget spent with payment still pending");
                        return VerificationOutcome::StillPending;
                    }
                    // `success` without data is fail-closed, like any
                    // unrecognized status.
                    _ => {
                        tracing::warn!("payment not confirmed");
                        self.state_tx.send_replace(VerificationState::Failed);
                        return VerificationOutcome::Failed;
                    }
                },
                Err(VerifyTransportError::NotFound) => {
                    tracing::warn!("payment record not found");
                    self.state_tx.send_replace(VerificationState::NotFound);
                    return VerificationOutcome::NotFound;
                }
                Err(VerifyTransportError::BadRequest) => {
                    tracing::warn!("backend rejected the reference");
                    self.state_tx.send_replace(VerificationState::Failed);
                    return VerificationOutcome::Failed;
                }
                Err(VerifyTransportError::Unknown(message)) => {
                    tracing::error!(error = %message, "verification transport failure");
                    self.state_tx.send_replace(VerificationState::Error);
                    return VerificationOutcome::Error(message);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::super::VerifyResponse;
    use super::*;

    /// Backend that replays a fixed script of responses.
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<VerifyResponse, VerifyTransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<VerifyResponse, VerifyTransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VerifyBackend for ScriptedBackend {
        async fn verify_by_reference(
            &self,
            _reference: &Reference,
        ) -> Result<VerifyResponse, VerifyTransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("poller called the backend more times than scripted")
        }
    }

    fn pending() -> Result<VerifyResponse, VerifyTransportError> {
        Ok(VerifyResponse {
            status: VerifyStatus::Pending,
            data: None,
        })
    }

    fn success() -> Result<VerifyResponse, VerifyTransportError> {
        Ok(VerifyResponse {
            status: VerifyStatus::Success,
            data: Some(serde_json::from_str(r#"{"reference":"PAY-123","amount_minor_units":500000}"#).unwrap()),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_two_retries() {
        let backend = ScriptedBackend::new(vec![pending(), pending(), success()]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-123")).await;

        assert!(matches!(outcome, VerificationOutcome::Success(_)));
        assert_eq!(poller.state(), VerificationState::Success);
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_freezes_pending_after_three_attempts() {
        let backend = ScriptedBackend::new(vec![pending(), pending(), pending()]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-123")).await;

        assert!(matches!(outcome, VerificationOutcome::StillPending));
        assert_eq!(poller.state(), VerificationState::Pending);
        assert!(!poller.state().is_terminal());
        assert_eq!(backend.calls(), 3);

        // The frozen state schedules nothing: advancing well past the retry
        // interval produces no fourth call.
        tokio::time::advance(PENDING_RETRY_DELAY * 10).await;
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_immediate_and_terminal() {
        let backend = ScriptedBackend::new(vec![Err(VerifyTransportError::NotFound)]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-404")).await;

        assert!(matches!(outcome, VerificationOutcome::NotFound));
        assert_eq!(poller.state(), VerificationState::NotFound);
        assert!(poller.state().is_terminal());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_failed() {
        let backend = ScriptedBackend::new(vec![Err(VerifyTransportError::BadRequest)]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-400")).await;

        assert!(matches!(outcome, VerificationOutcome::Failed));
        assert_eq!(poller.state(), VerificationState::Failed);
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_error() {
        let backend =
            ScriptedBackend::new(vec![Err(VerifyTransportError::Unknown("boom".to_string()))]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-1")).await;

        assert!(matches!(outcome, VerificationOutcome::Error(_)));
        assert_eq!(poller.state(), VerificationState::Error);
    }

    #[tokio::test]
    async fn test_success_without_data_fails_closed() {
        let backend = ScriptedBackend::new(vec![Ok(VerifyResponse {
            status: VerifyStatus::Success,
            data: None,
        })]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let outcome = poller.verify(&Reference::new("PAY-1")).await;

        assert!(matches!(outcome, VerificationOutcome::Failed));
    }

    #[tokio::test]
    async fn test_missing_reference_makes_no_network_call() {
        let backend = ScriptedBackend::new(vec![]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let url = Url::parse("https://stagepass.test/checkout/confirmation?status=success")
            .unwrap();
        let outcome = poller.run_from_redirect(&url).await;

        assert!(matches!(outcome, VerificationOutcome::Error(_)));
        assert_eq!(poller.state(), VerificationState::Error);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_from_redirect_accepts_trxref() {
        let backend = ScriptedBackend::new(vec![success()]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let url =
            Url::parse("https://stagepass.test/checkout/confirmation?trxref=PAY-123").unwrap();
        let outcome = poller.run_from_redirect(&url).await;

        assert!(matches!(outcome, VerificationOutcome::Success(_)));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_retry() {
        let backend = ScriptedBackend::new(vec![pending(), success()]);
        let poller = VerificationPoller::new(Arc::clone(&backend) as Arc<dyn VerifyBackend>);

        let handle = tokio::spawn(async move {
            poller.verify(&Reference::new("PAY-123")).await
        });

        // Let the first call land, then tear the view down mid-delay.
        tokio::task::yield_now().await;
        assert_eq!(backend.calls(), 1);
        handle.abort();

        tokio::time::advance(PENDING_RETRY_DELAY * 10).await;
        tokio::task::yield_now().await;
        assert_eq!(backend.calls(), 1);
    }
}
