//! Backend order API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use stagepass_core::Reference;
use thiserror::Error;
use tracing::instrument;

use crate::config::CheckoutConfig;
use crate::verify::{VerifyBackend, VerifyResponse, VerifyTransportError};

use super::types::{OrderInitRequest, OrderInitResult};

/// Errors that can occur while initializing an order.
///
/// The variant decides which remediation the shopper sees, so the backend's
/// error message is classified here, at the boundary of the component that
/// issued the call.
#[derive(Debug, Error)]
pub enum InitError {
    /// Requested tickets are no longer available.
    #[error("items unavailable: {0}")]
    Inventory(String),

    /// The order referenced an unknown or invalid event or tier.
    #[error("invalid order request: {0}")]
    Validation(String),

    /// The backend refused the order for any other reason.
    #[error("order initialization failed: {0}")]
    Server(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl InitError {
    /// Remediation copy for the shopper.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::Inventory(_) => {
                "Some tickets in your cart are no longer available. Adjust your cart and try again."
            }
            Self::Validation(_) => {
                "We couldn't match your order to a live event. Refresh the page and rebuild your cart."
            }
            Self::Server(_) => "Something went wrong while creating your order. Please try again.",
            Self::Transport(_) => {
                "We couldn't reach the ticketing service. Check your connection and try again."
            }
        }
    }
}

/// The backend's `{status, data, message}` response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the StagePass backend API.
///
/// Covers the two endpoints the checkout flow depends on: order
/// initialization and verify-by-reference. One shared `reqwest::Client`
/// keeps connection pooling across calls.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a pending order and obtain the server-computed charge.
    ///
    /// Fail-closed: an envelope status other than `"success"` is a failure
    /// even when the HTTP layer reported success. Has no side effects on the
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] classified from the backend's error message.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn initialize_order(
        &self,
        request: &OrderInitRequest,
    ) -> Result<OrderInitResult, InitError> {
        let url = format!("{}/orders/initialize", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        let Ok(envelope) = serde_json::from_str::<ApiEnvelope>(&body) else {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "order initialization returned an unrecognized response"
            );
            return Err(InitError::Server(format!(
                "HTTP {status}: unrecognized response"
            )));
        };

        if envelope.status != "success" {
            let message = envelope.message.unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(message = %message, "order initialization refused");
            return Err(classify_failure(&message));
        }

        let data = envelope
            .data
            .ok_or_else(|| InitError::Server("success response without order data".to_string()))?;

        let result: OrderInitResult = serde_json::from_value(data)
            .map_err(|e| InitError::Server(format!("malformed order data: {e}")))?;

        tracing::info!(reference = %result.reference, "order initialized");
        Ok(result)
    }
}

#[async_trait]
impl VerifyBackend for BackendClient {
    /// Look up the final payment outcome for a reference.
    ///
    /// Read-only and safe to call repeatedly; the backend's classification
    /// of a finalized record is stable across calls.
    #[instrument(skip(self), fields(reference = %reference))]
    async fn verify_by_reference(
        &self,
        reference: &Reference,
    ) -> Result<VerifyResponse, VerifyTransportError> {
        let url = format!(
            "{}/payments/verify/{}",
            self.base_url,
            urlencoding::encode(reference.as_str())
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VerifyTransportError::Unknown(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(VerifyTransportError::NotFound),
            StatusCode::BAD_REQUEST => return Err(VerifyTransportError::BadRequest),
            status if !status.is_success() => {
                return Err(VerifyTransportError::Unknown(format!("HTTP {status}")));
            }
            _ => {}
        }

        response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| VerifyTransportError::Unknown(format!("malformed verify response: {e}")))
    }
}

/// Classify a backend refusal by its message wording.
fn classify_failure(message: &str) -> InitError {
    let lower = message.to_lowercase();

    if lower.contains("stock") || lower.contains("sold out") || lower.contains("availab") {
        InitError::Inventory(message.to_string())
    } else if lower.contains("not found") || lower.contains("invalid") {
        InitError::Validation(message.to_string())
    } else {
        InitError::Server(message.to_string())
    }
}
