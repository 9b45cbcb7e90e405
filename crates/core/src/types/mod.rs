//! Core types for StagePass.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod cart;
pub mod contact;
pub mod email;
pub mod reference;

pub use amount::ChargeAmount;
pub use cart::CartItem;
pub use contact::CustomerContact;
pub use email::{Email, EmailError};
pub use reference::Reference;
