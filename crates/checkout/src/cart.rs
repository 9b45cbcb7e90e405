//! Cart contract.
//!
//! The cart itself - its storage, quantity rules, display pricing - belongs
//! to the storefront. The checkout flow only ever reads the items and, after
//! a confirmed gateway success, clears them. That two-method surface is the
//! whole contract.

use std::sync::Mutex;

use stagepass_core::CartItem;

/// Read-and-clear access to the shopper's cart.
///
/// `clear` is invoked by the checkout flow exactly once per confirmed
/// payment; a cancelled or failed attempt leaves the cart untouched.
pub trait CartStore: Send + Sync {
    /// Returns the cart's items in display order.
    fn items(&self) -> Vec<CartItem>;

    /// Empties the cart.
    fn clear(&self);
}

/// In-memory [`CartStore`] for tests and embedding contexts that have no
/// persistent cart of their own.
#[derive(Default)]
pub struct InMemoryCart {
    items: Mutex<Vec<CartItem>>,
}

impl InMemoryCart {
    /// Create a cart holding `items`.
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl CartStore for InMemoryCart {
    fn items(&self) -> Vec<CartItem> {
        self.items.lock().map_or_else(|_| Vec::new(), |items| items.clone())
    }

    fn clear(&self) {
        if let Ok(mut items) = self.items.lock() {
            items.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vip_ticket() -> CartItem {
        CartItem {
            event_id: "E1".to_string(),
            tier_id: "T1".to_string(),
            tier_name: "VIP".to_string(),
            quantity: 2,
            max_quantity: 10,
        }
    }

    #[test]
    fn test_items_returns_copy() {
        let cart = InMemoryCart::new(vec![vip_ticket()]);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].tier_name, "VIP");
    }

    #[test]
    fn test_clear_empties_cart() {
        let cart = InMemoryCart::new(vec![vip_ticket()]);
        cart.clear();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_default_cart_is_empty() {
        let cart = InMemoryCart::default();
        assert!(cart.items().is_empty());
    }
}
