//! Server-authoritative charge amount.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The amount to charge, in the smallest currency unit.
///
/// A `ChargeAmount` has no public constructor. Values come into existence
/// only by deserializing a backend response, so any amount handed to the
/// payment gateway is, by construction, the server-computed one. There is
/// deliberately no way to build a `ChargeAmount` from a client-side cart
/// total.
///
/// Amounts are integers in minor units (e.g. cents) to avoid floating-point
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeAmount(u64);

impl ChargeAmount {
    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Formats the amount in major units with two decimal places,
    /// e.g. `500000` minor units renders as `"5000.00"`.
    #[must_use]
    pub fn display_major(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for ChargeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_major())
    }
}
