//! # Pricing Resolver
//!
//! Margin ↔ price derivation and unit price resolution.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  margin% = (sale − cost) / sale × 100        (denominator: SALE price)  │
//! │  sale    = cost / (1 − margin/100)           (margin < 100)             │
//! │                                                                         │
//! │  Example: cost R$ 0,50, margin 60%                                      │
//! │           sale = 0.50 / 0.40 = R$ 1,25                                  │
//! │           margin = (1.25 − 0.50) / 1.25 × 100 = 60%                     │
//! │                                                                         │
//! │  The same pair of formulas links sale price ↔ resale price through      │
//! │  the client-facing margin, with the sale price playing "cost".          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! [`margin_from_prices`] and [`price_from_margin`] work on unrounded
//! `Decimal`s. Everything that gets stored or redisplayed goes through
//! [`derive_sale_price`] / [`derive_margin`], which round half-up to two
//! decimal places right away so repeated edits do not drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::custom_price::CustomPriceIndex;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_margin, validate_not_lower, validate_price, ValidationResult};

/// Decimal places kept for margins and prices after a derivation.
const DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Pure Formulas
// =============================================================================

/// Computes `(sale − cost) / sale × 100`, unrounded.
///
/// ## Errors
/// - [`CoreError::ZeroSalePrice`] when `sale ≤ 0` (the division is undefined)
/// - negative cost is a validation error
///
/// ## Example
/// ```rust
/// use paozinho_core::pricing::margin_from_prices;
/// use rust_decimal::Decimal;
///
/// let margin = margin_from_prices(Decimal::new(50, 2), Decimal::new(125, 2)).unwrap();
/// assert_eq!(margin, Decimal::new(60, 0));
/// ```
pub fn margin_from_prices(cost: Decimal, sale: Decimal) -> CoreResult<Decimal> {
    if sale <= Decimal::ZERO {
        return Err(CoreError::ZeroSalePrice);
    }

    if cost < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "cost price".to_string(),
        }
        .into());
    }

    (sale - cost)
        .checked_div(sale)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(CoreError::PriceOutOfRange)
}

/// Computes `cost / (1 − margin/100)`, unrounded.
///
/// ## Errors
/// - [`CoreError::MarginTooHigh`] when `margin ≥ 100`
/// - [`CoreError::PriceOutOfRange`] when the quotient overflows
/// - negative margin or negative cost is a validation error
///
/// ## Example
/// ```rust
/// use paozinho_core::pricing::price_from_margin;
/// use rust_decimal::Decimal;
///
/// let sale = price_from_margin(Decimal::new(50, 2), Decimal::new(60, 0)).unwrap();
/// assert_eq!(sale, Decimal::new(125, 2));
/// ```
pub fn price_from_margin(cost: Decimal, margin: Decimal) -> CoreResult<Decimal> {
    if margin >= Decimal::ONE_HUNDRED {
        return Err(CoreError::MarginTooHigh {
            margin: margin.normalize().to_string(),
        });
    }

    validate_margin("margin", margin)?;

    if cost < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "cost price".to_string(),
        }
        .into());
    }

    let denominator = Decimal::ONE - margin / Decimal::ONE_HUNDRED;
    cost.checked_div(denominator).ok_or(CoreError::PriceOutOfRange)
}

/// Rounds a margin percent half-up to two decimal places.
#[inline]
pub fn round_margin(margin: Decimal) -> Decimal {
    margin.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Rounded Derivations (what forms store)
// =============================================================================

/// Derives a price from a base price and margin, rounded to centavos.
pub fn derive_sale_price(base: Money, margin: Decimal) -> CoreResult<Money> {
    let raw = price_from_margin(base.to_decimal(), margin)?;
    Money::from_decimal(raw).ok_or(CoreError::PriceOutOfRange)
}

/// Derives the margin between a base price and a price, rounded to 2 places.
pub fn derive_margin(base: Money, price: Money) -> CoreResult<Decimal> {
    margin_from_prices(base.to_decimal(), price.to_decimal()).map(round_margin)
}

// =============================================================================
// Unit Price Resolution
// =============================================================================

/// Resolves the unit price charged to `client_id` for `product`.
///
/// The client's custom price wins; otherwise the catalog sale price applies.
/// Pure lookup, no side effects.
pub fn resolve_unit_price(product: &Product, client_id: &str, index: &CustomPriceIndex) -> Money {
    match index.lookup(client_id, &product.id) {
        Some(custom) => {
            debug!(product_id = %product.id, client_id = %client_id, "Using custom price");
            custom.sale_price
        }
        None => product.sale_price,
    }
}

// =============================================================================
// Price Sheet (product form model)
// =============================================================================

/// Editable price fields of a product, kept mutually consistent.
///
/// ## Edit Propagation
/// ```text
/// set_cost ──────────► sale = f(cost, profit_margin) ──► resale = f(sale, resale_margin)
/// set_profit_margin ─► sale = f(cost, profit_margin) ──► resale = f(sale, resale_margin)
/// set_sale_price ────► profit_margin = g(cost, sale) ──► resale = f(sale, resale_margin)
/// set_resale_margin ─► resale = f(sale, resale_margin)
/// set_resale_price ──► resale_margin = g(sale, resale)
/// ```
/// A failed edit leaves the sheet untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceSheet {
    pub cost_price: Money,
    pub sale_price: Money,
    #[ts(as = "String")]
    pub profit_margin: Decimal,
    pub resale_price: Money,
    #[ts(as = "String")]
    pub resale_margin: Decimal,
}

impl PriceSheet {
    /// Builds a sheet from a cost and both margins.
    pub fn from_cost_and_margins(
        cost_price: Money,
        profit_margin: Decimal,
        resale_margin: Decimal,
    ) -> CoreResult<Self> {
        validate_price("cost price", cost_price)?;
        let sale_price = derive_sale_price(cost_price, profit_margin)?;
        let resale_price = derive_sale_price(sale_price, resale_margin)?;

        Ok(PriceSheet {
            cost_price,
            sale_price,
            profit_margin: round_margin(profit_margin),
            resale_price,
            resale_margin: round_margin(resale_margin),
        })
    }

    /// Builds a sheet from three prices, deriving both margins.
    pub fn from_prices(cost_price: Money, sale_price: Money, resale_price: Money) -> CoreResult<Self> {
        validate_price("cost price", cost_price)?;
        validate_price("sale price", sale_price)?;
        validate_price("resale price", resale_price)?;

        Ok(PriceSheet {
            cost_price,
            sale_price,
            profit_margin: derive_margin(cost_price, sale_price)?,
            resale_price,
            resale_margin: derive_margin(sale_price, resale_price)?,
        })
    }

    /// Reads the sheet of an existing product.
    pub fn from_product(product: &Product) -> Self {
        PriceSheet {
            cost_price: product.cost_price,
            sale_price: product.sale_price,
            profit_margin: product.profit_margin,
            resale_price: product.resale_price,
            resale_margin: product.resale_margin,
        }
    }

    pub fn set_cost(&mut self, cost_price: Money) -> CoreResult<()> {
        validate_price("cost price", cost_price)?;
        let sale_price = derive_sale_price(cost_price, self.profit_margin)?;
        let resale_price = derive_sale_price(sale_price, self.resale_margin)?;

        self.cost_price = cost_price;
        self.sale_price = sale_price;
        self.resale_price = resale_price;
        Ok(())
    }

    pub fn set_profit_margin(&mut self, margin: Decimal) -> CoreResult<()> {
        let sale_price = derive_sale_price(self.cost_price, margin)?;
        let resale_price = derive_sale_price(sale_price, self.resale_margin)?;

        self.profit_margin = round_margin(margin);
        self.sale_price = sale_price;
        self.resale_price = resale_price;
        Ok(())
    }

    pub fn set_sale_price(&mut self, sale_price: Money) -> CoreResult<()> {
        validate_price("sale price", sale_price)?;
        let profit_margin = derive_margin(self.cost_price, sale_price)?;
        let resale_price = derive_sale_price(sale_price, self.resale_margin)?;

        self.sale_price = sale_price;
        self.profit_margin = profit_margin;
        self.resale_price = resale_price;
        Ok(())
    }

    pub fn set_resale_margin(&mut self, margin: Decimal) -> CoreResult<()> {
        let resale_price = derive_sale_price(self.sale_price, margin)?;

        self.resale_margin = round_margin(margin);
        self.resale_price = resale_price;
        Ok(())
    }

    pub fn set_resale_price(&mut self, resale_price: Money) -> CoreResult<()> {
        validate_price("resale price", resale_price)?;
        let resale_margin = derive_margin(self.sale_price, resale_price)?;

        self.resale_price = resale_price;
        self.resale_margin = resale_margin;
        Ok(())
    }

    /// Checks every bound the product form enforces before submission.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_price("cost price", self.cost_price)?;
        validate_price("sale price", self.sale_price)?;
        validate_price("resale price", self.resale_price)?;
        validate_not_lower("sale price", self.sale_price, "cost price", self.cost_price)?;
        validate_not_lower("resale price", self.resale_price, "sale price", self.sale_price)?;
        validate_margin("profit margin", self.profit_margin)?;
        validate_margin("resale margin", self.resale_margin)?;
        Ok(())
    }

    /// Returns the sheet with each margin agreeing with its prices.
    ///
    /// A margin is kept when it still derives the stored price to the
    /// centavo; otherwise it is recomputed from the prices, which win.
    pub fn with_consistent_margins(self) -> CoreResult<Self> {
        Ok(PriceSheet {
            profit_margin: consistent_margin(self.cost_price, self.sale_price, self.profit_margin)?,
            resale_margin: consistent_margin(self.sale_price, self.resale_price, self.resale_margin)?,
            ..self
        })
    }

    /// Copies the sheet onto a product.
    pub fn apply_to(&self, product: &mut Product) {
        product.cost_price = self.cost_price;
        product.sale_price = self.sale_price;
        product.profit_margin = self.profit_margin;
        product.resale_price = self.resale_price;
        product.resale_margin = self.resale_margin;
    }
}

fn consistent_margin(base: Money, price: Money, margin: Decimal) -> CoreResult<Decimal> {
    match derive_sale_price(base, margin) {
        Ok(derived) if derived == price => Ok(margin),
        _ => derive_margin(base, price),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceOverride;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    fn product(id: &str, sale_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            category_id: None,
            description: None,
            cost_price: Money::from_cents(50),
            sale_price: Money::from_cents(sale_cents),
            profit_margin: Decimal::ZERO,
            resale_price: Money::from_cents(sale_cents * 2),
            resale_margin: Decimal::new(50, 0),
        }
    }

    #[test]
    fn test_price_from_margin_scenario() {
        // 0.50 / (1 − 0.60) = 1.25
        let sale = price_from_margin(dec(50, 2), dec(60, 0)).unwrap();
        assert_eq!(sale, dec(125, 2));
        assert_eq!(derive_sale_price(Money::from_cents(50), dec(60, 0)).unwrap().cents(), 125);
    }

    #[test]
    fn test_margin_uses_sale_price_denominator() {
        // (2.00 − 1.00) / 2.00 = 50%, not the 100% markup
        let margin = margin_from_prices(dec(100, 2), dec(200, 2)).unwrap();
        assert_eq!(margin, dec(50, 0));
    }

    #[test]
    fn test_margin_zero_sale_price_is_an_error() {
        assert_eq!(
            margin_from_prices(dec(50, 2), Decimal::ZERO),
            Err(CoreError::ZeroSalePrice)
        );
    }

    #[test]
    fn test_margin_of_100_or_more_is_rejected() {
        assert!(matches!(
            price_from_margin(dec(50, 2), dec(100, 0)),
            Err(CoreError::MarginTooHigh { .. })
        ));
        assert!(matches!(
            price_from_margin(dec(50, 2), dec(150, 0)),
            Err(CoreError::MarginTooHigh { .. })
        ));
        assert!(matches!(
            price_from_margin(dec(50, 2), dec(-5, 0)),
            Err(CoreError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[test]
    fn test_round_trip_margin_within_a_cent() {
        let tolerance = dec(1, 2);
        let costs = [dec(1, 2), dec(50, 2), dec(333, 2), dec(12999, 2), dec(100000, 2)];
        let margins = [
            Decimal::ZERO,
            dec(1, 2),
            dec(125, 1),
            dec(3333, 2),
            dec(60, 0),
            dec(9999, 2),
        ];

        for cost in costs {
            for margin in margins {
                let sale = price_from_margin(cost, margin).unwrap();
                let back = margin_from_prices(cost, sale).unwrap();
                assert!(
                    (back - margin).abs() <= tolerance,
                    "cost {} margin {} came back as {}",
                    cost,
                    margin,
                    back
                );
            }
        }
    }

    #[test]
    fn test_derived_values_round_half_up() {
        // 1.00 / (1 − 0.33) = 1.49253... → 1.49
        assert_eq!(derive_sale_price(Money::from_cents(100), dec(33, 0)).unwrap().cents(), 149);
        // (1.25 − 0.50) / 1.25... exact 60.00
        assert_eq!(derive_margin(Money::from_cents(50), Money::from_cents(125)).unwrap(), dec(60, 0));
        // (3 − 1) / 3 = 66.666… → 66.67
        assert_eq!(derive_margin(Money::from_cents(100), Money::from_cents(300)).unwrap(), dec(6667, 2));
    }

    #[test]
    fn test_resolve_unit_price_prefers_custom_price() {
        let pao = product("pao", 125);
        let bolo = product("bolo", 1500);
        let mut index = CustomPriceIndex::new();
        index
            .assign_custom_price(
                "cli-1",
                "pao",
                PriceOverride {
                    sale_price: Money::from_cents(110),
                    resale_price: Money::from_cents(200),
                },
            )
            .unwrap();

        assert_eq!(resolve_unit_price(&pao, "cli-1", &index).cents(), 110);
        assert_eq!(resolve_unit_price(&pao, "cli-2", &index).cents(), 125);
        assert_eq!(resolve_unit_price(&bolo, "cli-1", &index).cents(), 1500);
    }

    #[test]
    fn test_price_sheet_edit_propagation() {
        let mut sheet = PriceSheet::from_cost_and_margins(Money::from_cents(50), dec(60, 0), dec(50, 0)).unwrap();
        assert_eq!(sheet.sale_price.cents(), 125);
        assert_eq!(sheet.resale_price.cents(), 250);

        // Editing the sale price recomputes the profit margin
        sheet.set_sale_price(Money::from_cents(100)).unwrap();
        assert_eq!(sheet.profit_margin, dec(50, 0));
        assert_eq!(sheet.resale_price.cents(), 200);

        // Editing the cost keeps the margin and moves the prices
        sheet.set_cost(Money::from_cents(60)).unwrap();
        assert_eq!(sheet.sale_price.cents(), 120);
        assert_eq!(sheet.resale_price.cents(), 240);

        // Editing the resale price recomputes the resale margin
        sheet.set_resale_price(Money::from_cents(300)).unwrap();
        assert_eq!(sheet.resale_margin, dec(60, 0));
        assert!(sheet.validate().is_ok());
    }

    #[test]
    fn test_price_sheet_failed_edit_leaves_sheet_untouched() {
        let mut sheet = PriceSheet::from_cost_and_margins(Money::from_cents(50), dec(60, 0), dec(50, 0)).unwrap();
        let before = sheet;

        assert!(sheet.set_profit_margin(dec(100, 0)).is_err());
        assert!(sheet.set_sale_price(Money::zero()).is_err());
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_price_sheet_validate_rejects_sale_below_cost() {
        let sheet = PriceSheet::from_prices(Money::from_cents(200), Money::from_cents(150), Money::from_cents(300)).unwrap();
        assert!(matches!(
            sheet.validate(),
            Err(ValidationError::LowerThan { .. }) | Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_near_100_margin_is_out_of_range_not_a_panic() {
        let margin = Decimal::from_str_exact("99.99999999999999999999999999").unwrap();

        assert_eq!(price_from_margin(dec(1000, 2), margin), Err(CoreError::PriceOutOfRange));
        assert_eq!(derive_sale_price(Money::from_cents(50), margin), Err(CoreError::PriceOutOfRange));

        let mut sheet = PriceSheet::from_cost_and_margins(Money::from_cents(50), dec(60, 0), dec(50, 0)).unwrap();
        let before = sheet;
        assert_eq!(sheet.set_profit_margin(margin), Err(CoreError::PriceOutOfRange));
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_stale_margins_are_recomputed_from_prices() {
        let mut sheet =
            PriceSheet::from_prices(Money::from_cents(50), Money::from_cents(125), Money::from_cents(200)).unwrap();
        sheet.profit_margin = dec(5, 0);
        sheet.resale_margin = dec(90, 0);

        let fixed = sheet.with_consistent_margins().unwrap();
        assert_eq!(fixed.profit_margin, dec(60, 0));
        assert_eq!(fixed.resale_margin, dec(375, 1));
        assert_eq!(fixed.sale_price, Money::from_cents(125));
        assert_eq!(fixed.resale_price, Money::from_cents(200));
    }

    #[test]
    fn test_typed_margin_kept_when_it_derives_the_price() {
        // 1.00 / 0.67 = 1.49, while 1.49 back gives 32.89%
        let sheet = PriceSheet::from_cost_and_margins(Money::from_cents(100), dec(33, 0), dec(50, 0)).unwrap();
        let fixed = sheet.with_consistent_margins().unwrap();
        assert_eq!(fixed, sheet);
        assert_eq!(fixed.profit_margin, dec(33, 0));
    }
}
