//! StagePass Checkout - payment orchestration and verification.
//!
//! This crate coordinates a local ticket cart, a backend that computes
//! authoritative pricing, an external payment gateway, and the post-redirect
//! verification step that independently confirms the outcome.
//!
//! # Architecture
//!
//! - [`order`] - builds the price-free order-initialization request and calls
//!   the backend, which answers with the reference and the only charge amount
//!   this crate will ever hand to the gateway
//! - [`gateway`] - loads the gateway SDK once per page and hands control to
//!   the external payment UI with the server-authoritative amount
//! - [`verify`] - runs after the confirmation redirect and re-derives the
//!   payment outcome from the backend with bounded polling
//! - [`cart`] - the read-and-clear contract this crate holds on the cart
//!
//! # Security
//!
//! The client never computes the charge amount. [`stagepass_core::ChargeAmount`]
//! has no public constructor, so the value passed to the gateway can only
//! originate from a backend response. The gateway's browser-side success
//! callback is likewise never trusted as proof of payment; the verification
//! poller asks the backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use stagepass_checkout::config::CheckoutConfig;
//! use stagepass_checkout::order::{BackendClient, build_order_intent};
//!
//! let config = CheckoutConfig::from_env()?;
//! let backend = BackendClient::new(&config);
//!
//! let request = build_order_intent(&email, &cart.items(), &contact);
//! let order = backend.initialize_order(&request).await?;
//! // order.amount is the server-computed charge; hand it to the gateway.
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod gateway;
pub mod order;
pub mod verify;

pub use error::CheckoutError;
