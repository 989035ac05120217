//! # Sale Line Aggregator
//!
//! Builds the line-item list and total of a new sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Form Action              Operation               Cart Change           │
//! │  ───────────              ─────────               ───────────           │
//! │                                                                         │
//! │  Pick Product ───────────► add_line() ──────────► qty += 1 or push      │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ──────► qty = n (≤ 0 drops)   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_line() ───────► lines.remove(i)       │
//! │                                                                         │
//! │  Submit ─────────────────► into_new_sale() ─────► PENDENTE Sale         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are exact: every line is an integer number of centavos, so the
//! sum never accumulates rounding error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::custom_price::CustomPriceIndex;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::resolve_unit_price;
use crate::types::{Product, Sale, SaleLineItem, SaleStatus};
use crate::validation::validate_notes;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A line of the sale being assembled.
///
/// ## Design Notes
/// `product_name` and `unit_price` are frozen copies taken when the line is
/// created, so a catalog edit made while the form is open does not change
/// what the client is charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,

    /// Product name at time of adding (frozen)
    pub product_name: String,

    /// Resolved unit price at time of adding (frozen)
    pub unit_price: Money,

    /// Whether `unit_price` came from a client override.
    pub custom_price: bool,

    pub quantity: i64,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The sale being assembled on the new-sale form.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product bumps quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most [`MAX_CART_ITEMS`] lines
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub lines: Vec<CartLine>,

    /// When the cart was created or last cleared
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of `product` for `client_id`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1, price untouched
    /// - Product not in cart: new line with quantity 1, priced by
    ///   [`resolve_unit_price`] at this moment
    pub fn add_line(&mut self, product: &Product, client_id: &str, index: &CustomPriceIndex) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(quantity_out_of_range().into());
            }
            line.quantity = new_qty;
            debug!(product_id = %product.id, quantity = new_qty, "Cart line incremented");
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        let unit_price = resolve_unit_price(product, client_id, index);
        self.lines.push(CartLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price,
            custom_price: index.lookup(client_id, &product.id).is_some(),
            quantity: 1,
            added_at: Utc::now(),
        });
        debug!(product_id = %product.id, unit_price = %unit_price, "Cart line added");
        Ok(())
    }

    /// Sets the quantity of a line. `quantity ≤ 0` removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(quantity_out_of_range().into());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by product id.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ProductNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.lines.iter().any(|l| l.product_id == product_id)
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Freezes the cart into a new PENDENTE sale.
    ///
    /// The sale and line ids are local placeholders; the remote API assigns
    /// the definitive ones on creation.
    pub fn into_new_sale(
        self,
        client_id: &str,
        client_name: Option<String>,
        notes: Option<String>,
        sale_date: NaiveDate,
    ) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if client_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "client".to_string(),
            }
            .into());
        }
        validate_notes(notes.as_deref())?;

        let total = self.total();
        let items = self
            .lines
            .into_iter()
            .map(|line| SaleLineItem {
                id: Uuid::new_v4().to_string(),
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                returns: Vec::new(),
            })
            .collect();

        Ok(Sale {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            client_name,
            status: SaleStatus::Pendente,
            items,
            total,
            notes: notes.filter(|n| !n.trim().is_empty()),
            sale_date,
            payments: Vec::new(),
            created_at: Utc::now(),
            settled_at: None,
        })
    }
}

fn quantity_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: "1".to_string(),
        max: MAX_ITEM_QUANTITY.to_string(),
    }
}

/// Cart summary for the form footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceOverride;
    use rust_decimal::Decimal;

    fn test_product(id: &str, sale_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            category_id: None,
            description: None,
            cost_price: Money::from_cents(sale_cents / 2),
            sale_price: Money::from_cents(sale_cents),
            profit_margin: Decimal::new(50, 0),
            resale_price: Money::from_cents(sale_cents * 2),
            resale_margin: Decimal::new(50, 0),
        }
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let mut cart = Cart::new();
        let index = CustomPriceIndex::new();
        let pao = test_product("pao", 80);

        cart.add_line(&pao, "cli", &index).unwrap();
        cart.add_line(&pao, "cli", &index).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.line("pao").unwrap().quantity, 2);
        assert_eq!(cart.total(), Money::from_cents(160));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let index = CustomPriceIndex::new();
        cart.add_line(&test_product("pao", 80), "cli", &index).unwrap();

        cart.set_quantity("pao", 0).unwrap();

        assert!(!cart.contains("pao"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_bounds() {
        let mut cart = Cart::new();
        let index = CustomPriceIndex::new();
        cart.add_line(&test_product("pao", 80), "cli", &index).unwrap();

        cart.set_quantity("pao", 12).unwrap();
        assert_eq!(cart.total(), Money::from_cents(960));

        assert!(cart.set_quantity("pao", MAX_ITEM_QUANTITY + 1).is_err());
        assert!(matches!(
            cart.set_quantity("bolo", 2),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_custom_price_frozen_at_insertion() {
        let mut cart = Cart::new();
        let mut index = CustomPriceIndex::new();
        let mut bolo = test_product("bolo", 1500);
        index
            .assign_custom_price(
                "cli",
                "bolo",
                PriceOverride {
                    sale_price: Money::from_cents(1200),
                    resale_price: Money::from_cents(1800),
                },
            )
            .unwrap();

        cart.add_line(&bolo, "cli", &index).unwrap();
        let line = cart.line("bolo").unwrap();
        assert_eq!(line.unit_price, Money::from_cents(1200));
        assert!(line.custom_price);

        // Catalog edit after insertion does not reprice the line
        bolo.sale_price = Money::from_cents(2000);
        cart.add_line(&bolo, "cli", &index).unwrap();
        assert_eq!(cart.line("bolo").unwrap().unit_price, Money::from_cents(1200));
        assert_eq!(cart.total(), Money::from_cents(2400));
    }

    #[test]
    fn test_into_new_sale() {
        let mut cart = Cart::new();
        let index = CustomPriceIndex::new();
        cart.add_line(&test_product("pao", 80), "cli", &index).unwrap();
        cart.add_line(&test_product("sonho", 350), "cli", &index).unwrap();
        cart.set_quantity("pao", 10).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let sale = cart
            .into_new_sale("cli", Some("Padaria Central".to_string()), None, date)
            .unwrap();

        assert_eq!(sale.status, SaleStatus::Pendente);
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.total, Money::from_cents(1150));
        assert_eq!(sale.sale_date, date);
        assert!(sale.payments.is_empty());
    }

    #[test]
    fn test_empty_cart_cannot_become_sale() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let err = Cart::new().into_new_sale("cli", None, None, date).unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
    }

    #[test]
    fn test_sale_requires_client() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("pao", 80), "", &CustomPriceIndex::new())
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(matches!(
            cart.into_new_sale("  ", None, None, date),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_cart_totals() {
        let mut cart = Cart::new();
        let index = CustomPriceIndex::new();
        cart.add_line(&test_product("pao", 80), "cli", &index).unwrap();
        cart.set_quantity("pao", 3).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total, Money::from_cents(240));
    }
}
