//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STAGEPASS_API_URL` - Base URL of the StagePass backend API
//! - `STAGEPASS_GATEWAY_PUBLIC_KEY` - Payment gateway public key (pk_...)
//!
//! ## Optional
//! - `STAGEPASS_CONFIRMATION_PATH` - Path of the confirmation view the
//!   gateway redirects back to (default: /checkout/confirmation)

use thiserror::Error;
use url::Url;

/// Prefix every gateway public key carries.
const PUBLIC_KEY_PREFIX: &str = "pk_";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid gateway public key: {0}")]
    InvalidPublicKey(String),
}

/// Checkout flow configuration.
///
/// Holds only public values: this flow runs on the untrusted side of the
/// system, so there is no gateway secret key here by design. The backend
/// holds the secret and is the only party that can settle or verify a charge.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the StagePass backend API.
    pub api_base_url: String,
    /// Payment gateway public key (safe to expose in the browser).
    pub gateway_public_key: String,
    /// Path of the confirmation view reached after the gateway redirect.
    pub confirmation_path: String,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, the API URL
    /// does not parse, or the public key fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("STAGEPASS_API_URL")?;
        Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STAGEPASS_API_URL".to_string(), e.to_string())
        })?;

        let gateway_public_key = get_required_env("STAGEPASS_GATEWAY_PUBLIC_KEY")?;
        validate_public_key(&gateway_public_key)?;

        let confirmation_path =
            get_env_or_default("STAGEPASS_CONFIRMATION_PATH", "/checkout/confirmation");

        Ok(Self {
            api_base_url,
            gateway_public_key,
            confirmation_path,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a gateway public key looks like a real key.
///
/// A wrong key here is only discovered when the gateway UI refuses to open,
/// long after configuration time; rejecting obvious placeholders moves that
/// failure to startup.
fn validate_public_key(key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidPublicKey("key is empty".to_string()));
    }

    if !key.starts_with(PUBLIC_KEY_PREFIX) {
        return Err(ConfigError::InvalidPublicKey(format!(
            "key must start with '{PUBLIC_KEY_PREFIX}'"
        )));
    }

    let lower = key.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidPublicKey(format!(
                "appears to be a placeholder (contains '{pattern}')"
            )));
        }
    }

    Ok(())
}
