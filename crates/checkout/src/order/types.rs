//! Order wire types.

use serde::{Deserialize, Serialize};
use stagepass_core::{ChargeAmount, CustomerContact, Email, Reference};

/// One ticket line on the order-initialization request.
///
/// Carries only identity and quantity. Pricing is deliberately absent: the
/// backend prices every line itself and a request that claimed a price would
/// be a request the backend could be lied to with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineItem {
    /// Event the ticket belongs to.
    pub event_id: String,
    /// Tier display name as the backend catalogues it.
    pub tier_name: String,
    /// Number of tickets.
    pub quantity: u32,
}

/// The order-initialization request sent to the backend.
///
/// Built fresh per checkout attempt by
/// [`build_order_intent`](super::build_order_intent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderInitRequest {
    /// Customer email the order and receipt are keyed to.
    pub email: Email,
    /// Ticket lines, in cart order.
    pub items: Vec<OrderLineItem>,
    /// Contact details from the checkout form.
    pub customer: CustomerContact,
}

/// Lifecycle status of the pending order as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    #[serde(other)]
    Unknown,
}

/// The backend's answer to a successful order initialization.
///
/// `amount` is the sole authoritative charge amount; it is read here once
/// for the gateway handoff and read again server-side during verification.
/// The two reads are of the same backend record, never of shared client
/// memory.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInitResult {
    /// Opaque reference correlating this attempt everywhere.
    pub reference: Reference,
    /// Server-computed charge amount in minor units.
    #[serde(rename = "amount_minor_units")]
    pub amount: ChargeAmount,
    /// Order status at creation time.
    pub status: OrderStatus,
}
