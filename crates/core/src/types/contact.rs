//! Customer contact details.

use serde::{Deserialize, Serialize};

/// Contact details collected by the checkout form.
///
/// Owned by the form collaborator; the checkout flow reads these into the
/// order-initialization request and never writes them back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl CustomerContact {
    /// Returns `true` when every field required by the backend is present.
    ///
    /// The backend rejects orders with missing contact fields; checking here
    /// lets the flow fail before any network call is made.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.email.is_empty()
            && !self.phone.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> CustomerContact {
        CustomerContact {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+2348000000000".to_string(),
            city: "Lagos".to_string(),
            state: "Lagos".to_string(),
            country: "NG".to_string(),
        }
    }

    #[test]
    fn test_complete_contact() {
        assert!(contact().is_complete());
    }

    #[test]
    fn test_missing_phone_is_incomplete() {
        let mut c = contact();
        c.phone.clear();
        assert!(!c.is_complete());
    }
}
