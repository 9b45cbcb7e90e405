//! Payment reference type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference correlating one checkout attempt.
///
/// The backend assigns a reference when it creates a pending order; the same
/// string is handed to the payment gateway, carried through the confirmation
/// redirect, and used to look the attempt up again during verification. The
/// contents are never interpreted - a `Reference` is only stored, compared,
/// and forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// Wrap an opaque reference string.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the reference is empty.
    ///
    /// An empty reference never identifies an attempt; callers extracting
    /// references from URLs must treat empty values as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Reference {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let reference = Reference::new("PAY-123");
        assert_eq!(reference.to_string(), "PAY-123");
    }

    #[test]
    fn test_serde_transparent() {
        let reference = Reference::new("PAY-123");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"PAY-123\"");

        let parsed: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn test_is_empty() {
        assert!(Reference::new("").is_empty());
        assert!(!Reference::new("PAY-123").is_empty());
    }
}
