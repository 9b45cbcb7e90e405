//! Gateway SDK bootstrap.
//!
//! The gateway's payment UI ships as an external SDK resource that must be
//! loaded once per page before any handoff can happen. This module owns that
//! load as an explicit state machine with a single owner, instead of ad hoc
//! polling of a global flag:
//!
//! ```text
//! NotRequested -> Loading -> Ready
//!                         -> LoadFailed
//! ```
//!
//! The loaded SDK is a page-wide singleton held in an [`SdkSlot`]; a
//! bootstrapper finding the slot already occupied (a previous mount loaded
//! it) goes straight to `Ready` without loading again. A failed load is not
//! retried automatically - re-injecting the resource could create duplicate
//! globals - so recovery requires a fresh bootstrapper (a remount).
//!
//! Dropping an in-flight [`GatewayBootstrapper::acquire`] future releases the
//! load request; the slot's content, once installed, persists across mounts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

/// Errors that can occur while loading the gateway SDK.
#[derive(Debug, Clone, Error)]
pub enum GatewayLoadError {
    /// The SDK resource failed to load.
    #[error("payment SDK failed to load: {0}")]
    Load(String),

    /// A previous load attempt on this bootstrapper already failed.
    #[error("payment SDK previously failed to load")]
    Unavailable,
}

impl GatewayLoadError {
    /// Remediation copy for the shopper.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        "The payment system is unavailable right now. Reload the page to try again."
    }
}

/// Load state of the gateway SDK, as seen by one bootstrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkState {
    /// No load has been requested yet.
    NotRequested,
    /// A load is in flight.
    Loading,
    /// The SDK is available; handoffs may launch.
    Ready,
    /// The load failed; this bootstrapper will not retry.
    LoadFailed,
}

/// Opaque handle to the loaded SDK resource.
#[derive(Debug, Clone)]
pub struct SdkHandle {
    source: String,
}

impl SdkHandle {
    /// Create a handle recording where the SDK was loaded from.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns the source the SDK was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Page-wide slot holding the loaded SDK.
///
/// Clones share the slot. The content is installed at most once and never
/// evicted; checking and installing both happen on the owning task, so a
/// synchronous occupancy check before loading is sufficient.
#[derive(Debug, Clone, Default)]
pub struct SdkSlot {
    inner: Arc<Mutex<Option<SdkHandle>>>,
}

impl SdkSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the SDK is already installed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.lock().is_ok_and(|slot| slot.is_some())
    }

    /// Install a loaded handle, keeping the first one on a race.
    fn install(&self, handle: SdkHandle) {
        if let Ok(mut slot) = self.inner.lock() {
            slot.get_or_insert(handle);
        }
    }
}

/// One-shot loader for the external SDK resource.
///
/// The production implementation is environment-specific (it injects the
/// resource into the page); tests script it.
#[async_trait]
pub trait SdkLoader: Send + Sync {
    /// Load the SDK resource, resolving when the load or error event fires.
    async fn load(&self) -> Result<SdkHandle, GatewayLoadError>;
}

/// Awaitable view of a bootstrapper's state, for parties that must wait for
/// readiness without owning the bootstrapper (the payment handoff).
#[derive(Debug, Clone)]
pub struct SdkReadiness {
    rx: watch::Receiver<SdkState>,
}

impl SdkReadiness {
    /// Current state, read synchronously.
    #[must_use]
    pub fn state(&self) -> SdkState {
        *self.rx.borrow()
    }

    /// Wait until the SDK is ready.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayLoadError::Unavailable`] if the load fails or the
    /// bootstrapper goes away before reaching `Ready`.
    pub async fn ready(&mut self) -> Result<(), GatewayLoadError> {
        loop {
            match *self.rx.borrow_and_update() {
                SdkState::Ready => return Ok(()),
                SdkState::LoadFailed => return Err(GatewayLoadError::Unavailable),
                SdkState::NotRequested | SdkState::Loading => {}
            }

            if self.rx.changed().await.is_err() {
                return Err(GatewayLoadError::Unavailable);
            }
        }
    }
}

/// Owner of the SDK load for one mounted checkout view.
pub struct GatewayBootstrapper {
    slot: SdkSlot,
    state_tx: watch::Sender<SdkState>,
}

impl GatewayBootstrapper {
    /// Create a bootstrapper over the page's SDK slot.
    #[must_use]
    pub fn new(slot: SdkSlot) -> Self {
        let (state_tx, _) = watch::channel(SdkState::NotRequested);
        Self { slot, state_tx }
    }

    /// Current state, read synchronously.
    #[must_use]
    pub fn state(&self) -> SdkState {
        *self.state_tx.borrow()
    }

    /// Subscribe to state changes as an awaitable readiness signal.
    #[must_use]
    pub fn readiness(&self) -> SdkReadiness {
        SdkReadiness {
            rx: self.state_tx.subscribe(),
        }
    }

    /// Ensure the SDK is available, loading it if this page has not yet.
    ///
    /// Idempotent on success. After a failure the bootstrapper stays in
    /// `LoadFailed` and further calls return without invoking the loader
    /// again; recovery requires a fresh bootstrapper.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayLoadError`] if the loader fails or a previous
    /// attempt already failed.
    #[instrument(skip_all)]
    pub async fn acquire(&mut self, loader: &dyn SdkLoader) -> Result<(), GatewayLoadError> {
        match self.state() {
            SdkState::Ready => return Ok(()),
            SdkState::LoadFailed => return Err(GatewayLoadError::Unavailable),
            SdkState::NotRequested | SdkState::Loading => {}
        }

        // A previous mount may have loaded the SDK already; the slot check
        // must happen before any load request to keep the resource single.
        if self.slot.is_loaded() {
            self.state_tx.send_replace(SdkState::Ready);
            tracing::debug!("gateway SDK already present, skipping load");
            return Ok(());
        }

        self.state_tx.send_replace(SdkState::Loading);
        match loader.load().await {
            Ok(handle) => {
                tracing::info!(source = handle.source(), "gateway SDK loaded");
                self.slot.install(handle);
                self.state_tx.send_replace(SdkState::Ready);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "gateway SDK load failed");
                self.state_tx.send_replace(SdkState::LoadFailed);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct ScriptedLoader {
        result: Result<SdkHandle, GatewayLoadError>,
        calls: AtomicU32,
    }

    impl ScriptedLoader {
        fn ok() -> Self {
            Self {
                result: Ok(SdkHandle::new("https://js.gateway.test/v1/inline.js")),
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(GatewayLoadError::Load("network error".to_string())),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SdkLoader for ScriptedLoader {
        async fn load(&self) -> Result<SdkHandle, GatewayLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_load_transitions_to_ready() {
        let mut bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let loader = ScriptedLoader::ok();

        assert_eq!(bootstrapper.state(), SdkState::NotRequested);
        bootstrapper.acquire(&loader).await.unwrap();
        assert_eq!(bootstrapper.state(), SdkState::Ready);
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_occupied_slot_skips_load() {
        let slot = SdkSlot::new();
        slot.install(SdkHandle::new("preloaded"));

        let mut bootstrapper = GatewayBootstrapper::new(slot);
        let loader = ScriptedLoader::ok();

        bootstrapper.acquire(&loader).await.unwrap();
        assert_eq!(bootstrapper.state(), SdkState::Ready);
        assert_eq!(loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_acquire_is_idempotent_once_ready() {
        let mut bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let loader = ScriptedLoader::ok();

        bootstrapper.acquire(&loader).await.unwrap();
        bootstrapper.acquire(&loader).await.unwrap();
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let mut bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let loader = ScriptedLoader::failing();

        let err = bootstrapper.acquire(&loader).await.unwrap_err();
        assert!(matches!(err, GatewayLoadError::Load(_)));
        assert_eq!(bootstrapper.state(), SdkState::LoadFailed);

        let err = bootstrapper.acquire(&loader).await.unwrap_err();
        assert!(matches!(err, GatewayLoadError::Unavailable));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_bootstrapper_reuses_slot_after_failure() {
        let slot = SdkSlot::new();

        let mut first = GatewayBootstrapper::new(slot.clone());
        let failing = ScriptedLoader::failing();
        first.acquire(&failing).await.unwrap_err();

        // Remount: a fresh bootstrapper may try again.
        let mut second = GatewayBootstrapper::new(slot);
        let loader = ScriptedLoader::ok();
        second.acquire(&loader).await.unwrap();
        assert_eq!(second.state(), SdkState::Ready);
    }

    #[tokio::test]
    async fn test_readiness_resolves_when_ready() {
        let mut bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let mut readiness = bootstrapper.readiness();
        let loader = ScriptedLoader::ok();

        let (acquired, readiness_result) =
            tokio::join!(bootstrapper.acquire(&loader), readiness.ready());
        acquired.unwrap();
        readiness_result.unwrap();
    }

    #[tokio::test]
    async fn test_readiness_errors_on_load_failure() {
        let mut bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let mut readiness = bootstrapper.readiness();
        let loader = ScriptedLoader::failing();

        let (acquired, readiness_result) =
            tokio::join!(bootstrapper.acquire(&loader), readiness.ready());
        acquired.unwrap_err();
        assert!(matches!(
            readiness_result,
            Err(GatewayLoadError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_readiness_errors_when_bootstrapper_dropped() {
        let bootstrapper = GatewayBootstrapper::new(SdkSlot::new());
        let mut readiness = bootstrapper.readiness();
        drop(bootstrapper);

        assert!(matches!(
            readiness.ready().await,
            Err(GatewayLoadError::Unavailable)
        ));
    }
}
