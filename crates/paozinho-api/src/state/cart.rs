//! # Cart State
//!
//! The sale under construction on the "Nova Venda" form.
//!
//! ## Thread Safety
//! Wrapped in `Arc<Mutex<T>>`: commands may run concurrently but only one
//! may change the cart at a time. The lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard};

use paozinho_core::{Cart, CartTotals};
use serde::Serialize;
use ts_rs::TS;

use paozinho_core::cart::CartLine;

/// Cart contents plus totals, as the form renders them.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            lines: cart.lines.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Thread-safe cart wrapper.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // A panic mid-edit leaves a cart that is still structurally valid.
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart_state.with_cart(|cart| cart.total());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(|cart| CartSnapshot::from(cart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paozinho_core::{CustomPriceIndex, Money, Product};
    use rust_decimal::Decimal;

    fn sonho() -> Product {
        Product {
            id: "sonho".to_string(),
            name: "Sonho".to_string(),
            category_id: None,
            description: None,
            cost_price: Money::from_cents(150),
            sale_price: Money::from_cents(350),
            profit_margin: Decimal::new(5714, 2),
            resale_price: Money::from_cents(500),
            resale_margin: Decimal::new(30, 0),
        }
    }

    #[test]
    fn test_shared_cart() {
        let state = CartState::new();
        let clone = state.clone();
        let index = CustomPriceIndex::new();

        clone
            .with_cart_mut(|cart| cart.add_line(&sonho(), "c1", &index))
            .unwrap();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.totals.total, Money::from_cents(350));
    }
}
