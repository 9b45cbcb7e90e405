//! StagePass Core - Shared types library.
//!
//! This crate provides common types used across all StagePass components:
//! - `checkout` - Checkout payment orchestration
//! - `integration-tests` - End-to-end flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no timers.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, payment references, charge
//!   amounts, and the cart/contact data the checkout flow reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
