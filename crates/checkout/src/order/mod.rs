//! Order initialization.
//!
//! Builds the price-free order-initialization request from the cart and the
//! checkout form, and calls the backend, which creates a pending order and
//! answers with the payment reference and the server-computed charge amount.
//!
//! # Wire format
//!
//! Requests and responses use the backend's snake_case JSON envelope:
//!
//! ```json
//! { "status": "success", "data": { "reference": "PAY-123", "amount_minor_units": 500000 } }
//! { "status": "error", "message": "Tier sold out" }
//! ```

mod client;
mod intent;
mod types;

pub use client::{BackendClient, InitError};
pub use intent::build_order_intent;
pub use types::{OrderInitRequest, OrderInitResult, OrderLineItem, OrderStatus};
