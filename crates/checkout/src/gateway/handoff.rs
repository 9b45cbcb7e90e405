//! Payment handoff.
//!
//! Hands exactly one checkout attempt to the external gateway UI and
//! consumes its callbacks. The charge configuration is assembled from the
//! order-initialization result verbatim - the amount and reference are moved,
//! never recomputed - and there is deliberately no way to pass a cart-derived
//! total into this module.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use stagepass_core::{CartItem, ChargeAmount, Email, Reference};
use thiserror::Error;
use tracing::instrument;

use crate::cart::CartStore;
use crate::config::CheckoutConfig;
use crate::order::OrderInitResult;

use super::bootstrap::{SdkReadiness, SdkState};

/// Lifecycle of one payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSessionState {
    /// Nothing prepared yet.
    Idle,
    /// An order is prepared but the gateway SDK is still loading.
    LoadingGateway,
    /// Order and SDK are both ready; the gateway may be launched.
    ReadyToPay,
    /// The gateway UI is open; exactly one session is outstanding.
    Submitting,
    /// The gateway confirmed; cart cleared and redirect issued.
    Success,
    /// The shopper closed the gateway; cart untouched, retry allowed.
    Cancelled,
    /// A fatal configuration error; this attempt is dead.
    Failed,
}

/// Errors that block a launch before the gateway is ever invoked.
#[derive(Debug, Clone, Error)]
pub enum HandoffError {
    /// The gateway SDK has not finished loading.
    #[error("payment gateway is not ready")]
    GatewayNotReady,

    /// The gateway SDK failed to load.
    #[error("payment gateway is unavailable")]
    GatewayUnavailable,

    /// No order-initialization result has been prepared.
    #[error("no pending order to pay for")]
    NoPendingOrder,

    /// The cart is empty.
    #[error("cart is empty")]
    EmptyCart,

    /// The gateway public key is missing from configuration. Fatal.
    #[error("gateway public key is not configured")]
    MissingPublicKey,

    /// A gateway session is already outstanding for this attempt.
    #[error("a payment attempt is already in progress")]
    AlreadySubmitting,

    /// This attempt already completed successfully.
    #[error("this order was already paid")]
    AlreadyCompleted,
}

impl HandoffError {
    /// Remediation copy for the shopper.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::GatewayNotReady => "The payment system is still loading. Give it a second.",
            Self::GatewayUnavailable => {
                "The payment system is unavailable right now. Reload the page to try again."
            }
            Self::NoPendingOrder => "Your order isn't ready yet. Start checkout again.",
            Self::EmptyCart => "Your cart is empty. Add tickets before checking out.",
            Self::MissingPublicKey => {
                "Payments are misconfigured on our side. Please contact support."
            }
            Self::AlreadySubmitting => "A payment window is already open.",
            Self::AlreadyCompleted => "This order has already been paid.",
        }
    }
}

/// One ticket line shown inside the gateway UI.
///
/// Display metadata only - the gateway settles on [`GatewayCharge::amount`],
/// never on these lines, so they carry no prices.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeLineItem {
    pub event_id: String,
    pub tier_name: String,
    pub quantity: u32,
}

/// The configuration handed to the gateway UI.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayCharge {
    /// Gateway public key identifying the merchant.
    pub public_key: String,
    /// Customer email the gateway keys its receipt to.
    pub email: Email,
    /// Server-authoritative charge amount, taken verbatim from the
    /// order-initialization result.
    pub amount: ChargeAmount,
    /// Reference correlating this attempt, likewise verbatim.
    pub reference: Reference,
    /// Display-only line items.
    pub metadata: Vec<ChargeLineItem>,
}

/// The gateway-assigned response delivered with its success callback.
///
/// A receipt is a browser-side signal, not proof of payment; the
/// verification poller re-derives the outcome from the backend.
#[derive(Debug, Clone)]
pub struct GatewayReceipt {
    /// Reference echoed back by the gateway.
    pub reference: Reference,
    /// Gateway status message, if any.
    pub message: Option<String>,
}

/// How one gateway session ended: exactly one of its two callbacks.
#[derive(Debug, Clone)]
pub enum GatewayOutcome {
    /// The success callback fired.
    Completed(GatewayReceipt),
    /// The shopper closed the gateway UI.
    Cancelled,
}

/// The external payment gateway UI, opaque to this crate.
///
/// A session suspends for as long as the shopper keeps the gateway open and
/// resolves when one of its callbacks fires.
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// Open the gateway UI for `charge` and wait for its callback.
    async fn launch(&self, charge: GatewayCharge) -> GatewayOutcome;
}

/// Redirect to the confirmation view after a confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    /// Relative location carrying the reference and a status hint.
    pub location: String,
    /// The reference, also available without re-parsing the location.
    pub reference: Reference,
}

/// How a launched handoff ended.
#[derive(Debug, Clone)]
pub enum HandoffOutcome {
    /// Payment confirmed by the gateway; follow the redirect.
    Completed(CheckoutRedirect),
    /// The shopper cancelled; the cart is intact and retry is allowed.
    Cancelled,
}

/// Coordinates one checkout attempt's gateway session.
pub struct PaymentHandoff {
    public_key: String,
    confirmation_path: String,
    readiness: SdkReadiness,
    cart: Arc<dyn CartStore>,
    gateway: Arc<dyn GatewaySession>,
    order: Option<OrderInitResult>,
    state: PaymentSessionState,
}

impl PaymentHandoff {
    /// Create a handoff for one mounted checkout view.
    #[must_use]
    pub fn new(
        config: &CheckoutConfig,
        readiness: SdkReadiness,
        cart: Arc<dyn CartStore>,
        gateway: Arc<dyn GatewaySession>,
    ) -> Self {
        Self {
            public_key: config.gateway_public_key.clone(),
            confirmation_path: config.confirmation_path.clone(),
            readiness,
            cart,
            gateway,
            order: None,
            state: PaymentSessionState::Idle,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> PaymentSessionState {
        self.state
    }

    /// Stage the backend's order-initialization result for payment.
    ///
    /// Must complete (successfully) before [`launch`](Self::launch) can run;
    /// that ordering is the precondition, not a queue.
    pub fn prepare(&mut self, order: OrderInitResult) {
        self.state = if self.readiness.state() == SdkState::Ready {
            PaymentSessionState::ReadyToPay
        } else {
            PaymentSessionState::LoadingGateway
        };
        self.order = Some(order);
    }

    /// Launch the gateway UI and wait for its callback.
    ///
    /// Single-flight: the exclusive borrow plus the `Submitting` guard keep
    /// at most one gateway session outstanding per attempt. On success the
    /// cart is cleared and the confirmation redirect built in one
    /// uninterruptible step; on cancel the cart is untouched and the
    /// handoff may be launched again.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError`] when a precondition is unmet; the gateway is
    /// never invoked in that case.
    #[instrument(skip(self, email), fields(state = ?self.state))]
    pub async fn launch(&mut self, email: &Email) -> Result<HandoffOutcome, HandoffError> {
        match self.state {
            PaymentSessionState::Submitting => return Err(HandoffError::AlreadySubmitting),
            PaymentSessionState::Success => return Err(HandoffError::AlreadyCompleted),
            _ => {}
        }

        match self.readiness.state() {
            SdkState::Ready => {}
            SdkState::LoadFailed => return Err(HandoffError::GatewayUnavailable),
            SdkState::NotRequested | SdkState::Loading => {
                return Err(HandoffError::GatewayNotReady);
            }
        }

        let order = self.order.as_ref().ok_or(HandoffError::NoPendingOrder)?;

        let items = self.cart.items();
        if items.is_empty() {
            return Err(HandoffError::EmptyCart);
        }

        let reference = order.reference.clone();
        let charge = match build_charge(&self.public_key, email, order, &items) {
            Ok(charge) => charge,
            Err(e) => {
                // Configuration failures are fatal, unlike a decline, which
                // the gateway handles inside its own UI.
                self.state = PaymentSessionState::Failed;
                return Err(e);
            }
        };

        self.state = PaymentSessionState::Submitting;
        tracing::info!(
            reference = %charge.reference,
            amount_minor_units = charge.amount.minor_units(),
            "handing off to payment gateway"
        );

        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.launch(charge).await;

        match outcome {
            GatewayOutcome::Completed(receipt) => Ok(HandoffOutcome::Completed(
                self.complete_success(&reference, &receipt),
            )),
            GatewayOutcome::Cancelled => {
                tracing::warn!(reference = %reference, "shopper closed the payment gateway");
                self.state = PaymentSessionState::Cancelled;
                Ok(HandoffOutcome::Cancelled)
            }
        }
    }

    /// Finish a confirmed payment.
    ///
    /// Runs synchronously with no suspension point between the state change,
    /// the redirect construction and the cart clear, so an interrupted
    /// redirect can never observe a half-cleared cart.
    fn complete_success(
        &mut self,
        reference: &Reference,
        receipt: &GatewayReceipt,
    ) -> CheckoutRedirect {
        self.state = PaymentSessionState::Success;
        tracing::info!(
            reference = %reference,
            gateway_message = receipt.message.as_deref().unwrap_or(""),
            "gateway confirmed payment"
        );

        let redirect = confirmation_redirect(&self.confirmation_path, reference);
        self.cart.clear();
        redirect
    }
}

/// Assemble the gateway configuration for one attempt.
///
/// Amount and reference come verbatim from the order-initialization result;
/// there is no parameter through which a client-computed total could arrive.
fn build_charge(
    public_key: &str,
    email: &Email,
    order: &OrderInitResult,
    items: &[CartItem],
) -> Result<GatewayCharge, HandoffError> {
    if public_key.trim().is_empty() {
        return Err(HandoffError::MissingPublicKey);
    }

    Ok(GatewayCharge {
        public_key: public_key.to_string(),
        email: email.clone(),
        amount: order.amount,
        reference: order.reference.clone(),
        metadata: items
            .iter()
            .map(|item| ChargeLineItem {
                event_id: item.event_id.clone(),
                tier_name: item.tier_name.clone(),
                quantity: item.quantity,
            })
            .collect(),
    })
}

/// Build the confirmation redirect for a confirmed reference.
///
/// The `status` parameter is a hint for rendering an optimistic spinner
/// message; the confirmation view never treats it as proof of payment.
fn confirmation_redirect(path: &str, reference: &Reference) -> CheckoutRedirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("reference", reference.as_str())
        .append_pair("status", "success")
        .finish();

    CheckoutRedirect {
        location: format!("{path}?{query}"),
        reference: reference.clone(),
    }
}
