//! Cart line item type.

use serde::{Deserialize, Serialize};

/// A ticket line item as the cart collaborator stores it.
///
/// The checkout flow reads cart items but never mutates them; quantities and
/// availability caps are maintained by the cart itself. Note the absence of
/// any price field - display pricing is the cart's concern, and the charge
/// amount is always recomputed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Event the ticket belongs to.
    pub event_id: String,
    /// Ticket tier identifier.
    pub tier_id: String,
    /// Human-readable tier name (e.g. "VIP"), used on the order wire format.
    pub tier_name: String,
    /// Number of tickets requested.
    pub quantity: u32,
    /// Maximum quantity the cart allows for this tier.
    pub max_quantity: u32,
}
