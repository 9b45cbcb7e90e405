//! Order intent building.

use stagepass_core::{CartItem, CustomerContact, Email};

use super::types::{OrderInitRequest, OrderLineItem};

/// Build the order-initialization request from checkout state.
///
/// Pure transform: no I/O, and identical inputs produce structurally
/// identical output. The caller owns the preconditions - a non-empty `items`
/// slice and a contact whose required fields are present (`Email` is valid by
/// construction). Nothing here validates or rejects; a violated precondition
/// produces a request the backend will refuse.
///
/// The output carries no price in any form. Cart-side display totals must
/// never reach this request; the backend prices the order itself.
#[must_use]
pub fn build_order_intent(
    email: &Email,
    items: &[CartItem],
    customer: &CustomerContact,
) -> OrderInitRequest {
    OrderInitRequest {
        email: email.clone(),
        items: items
            .iter()
            .map(|item| OrderLineItem {
                event_id: item.event_id.clone(),
                tier_name: item.tier_name.clone(),
                quantity: item.quantity,
            })
            .collect(),
        customer: customer.clone(),
    }
}
