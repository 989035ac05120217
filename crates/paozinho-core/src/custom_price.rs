//! # Custom Price Index
//!
//! Per-client price overrides, keyed by (client, product).
//!
//! ## Two Buckets
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │  Catalog (no override)       │      │  Custom prices for client X  │
//! │                              │ ───► │                              │
//! │  Pão Francês   R$ 0,80       │assign│  Bolo de Fubá  R$ 12,00      │
//! │  Sonho         R$ 3,50       │ ◄─── │  Broa          R$ 1,10       │
//! │                              │remove│                              │
//! └──────────────────────────────┘      └──────────────────────────────┘
//! ```
//! The drag gesture in the browser only picks which of the two explicit
//! operations to call: [`CustomPriceIndex::assign_custom_price`] or
//! [`CustomPriceIndex::remove_custom_price`].

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{CustomPrice, PriceOverride, Product};
use crate::validation::{validate_not_lower, validate_price, ValidationResult};

/// Validates an override pair: both prices ≥ R$ 0,01, resale ≥ sale.
pub fn validate_override(prices: &PriceOverride) -> ValidationResult<()> {
    validate_price("custom sale price", prices.sale_price)?;
    validate_price("custom resale price", prices.resale_price)?;
    validate_not_lower(
        "custom resale price",
        prices.resale_price,
        "custom sale price",
        prices.sale_price,
    )
}

/// In-memory index of custom prices.
///
/// ## Invariants
/// - At most one entry per (client, product)
/// - Every entry satisfies [`validate_override`]
#[derive(Debug, Clone, Default)]
pub struct CustomPriceIndex {
    by_pair: HashMap<(String, String), CustomPrice>,
}

impl CustomPriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from entries fetched from the remote API.
    ///
    /// Duplicate pairs keep the last entry seen.
    pub fn from_entries(entries: impl IntoIterator<Item = CustomPrice>) -> Self {
        let by_pair = entries
            .into_iter()
            .map(|c| ((c.client_id.clone(), c.product_id.clone()), c))
            .collect();
        CustomPriceIndex { by_pair }
    }

    /// Looks up the override for a client × product.
    pub fn lookup(&self, client_id: &str, product_id: &str) -> Option<&CustomPrice> {
        self.by_pair
            .get(&(client_id.to_string(), product_id.to_string()))
    }

    /// Finds an entry by its id.
    pub fn get(&self, custom_price_id: &str) -> Option<&CustomPrice> {
        self.by_pair.values().find(|c| c.id == custom_price_id)
    }

    /// All overrides of one client, ordered by product id.
    pub fn for_client(&self, client_id: &str) -> Vec<&CustomPrice> {
        let mut entries: Vec<&CustomPrice> = self
            .by_pair
            .values()
            .filter(|c| c.client_id == client_id)
            .collect();
        entries.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        entries
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Creates an override with a locally generated id.
    pub fn assign_custom_price(
        &mut self,
        client_id: &str,
        product_id: &str,
        prices: PriceOverride,
    ) -> CoreResult<CustomPrice> {
        let entry = CustomPrice {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            product_id: product_id.to_string(),
            sale_price: prices.sale_price,
            resale_price: prices.resale_price,
        };
        self.insert(entry.clone())?;
        Ok(entry)
    }

    /// Inserts an existing entry (e.g. the one the remote API returned).
    pub fn insert(&mut self, entry: CustomPrice) -> CoreResult<()> {
        validate_override(&entry.prices())?;

        let key = (entry.client_id.clone(), entry.product_id.clone());
        if self.by_pair.contains_key(&key) {
            return Err(CoreError::DuplicateCustomPrice {
                client_id: entry.client_id,
                product_id: entry.product_id,
            });
        }

        self.by_pair.insert(key, entry);
        Ok(())
    }

    /// Replaces the prices of an existing override in place.
    pub fn update_custom_price(&mut self, custom_price_id: &str, prices: PriceOverride) -> CoreResult<&CustomPrice> {
        validate_override(&prices)?;

        let entry = self
            .by_pair
            .values_mut()
            .find(|c| c.id == custom_price_id)
            .ok_or_else(|| CoreError::CustomPriceNotFound(custom_price_id.to_string()))?;

        entry.sale_price = prices.sale_price;
        entry.resale_price = prices.resale_price;
        Ok(&*entry)
    }

    /// Deletes an override, moving the product back to catalog pricing.
    pub fn remove_custom_price(&mut self, custom_price_id: &str) -> CoreResult<CustomPrice> {
        let key = self
            .by_pair
            .iter()
            .find(|(_, c)| c.id == custom_price_id)
            .map(|(k, _)| k.clone())
            .ok_or_else(|| CoreError::CustomPriceNotFound(custom_price_id.to_string()))?;

        self.by_pair
            .remove(&key)
            .ok_or_else(|| CoreError::CustomPriceNotFound(custom_price_id.to_string()))
    }
}

/// The two drag-and-drop buckets of a client's price board.
#[derive(Debug, Clone, Default)]
pub struct PriceBoard<'a> {
    /// Products with an override for the client, paired with it.
    pub custom: Vec<(&'a Product, &'a CustomPrice)>,
    /// Products still charged at catalog price.
    pub catalog: Vec<&'a Product>,
}

/// Splits the catalog into the two buckets shown for `client_id`.
pub fn price_board<'a>(products: &'a [Product], client_id: &str, index: &'a CustomPriceIndex) -> PriceBoard<'a> {
    let mut board = PriceBoard::default();

    for product in products {
        match index.lookup(client_id, &product.id) {
            Some(custom) => board.custom.push((product, custom)),
            None => board.catalog.push(product),
        }
    }

    board
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use rust_decimal::Decimal;

    fn prices(sale: i64, resale: i64) -> PriceOverride {
        PriceOverride {
            sale_price: Money::from_cents(sale),
            resale_price: Money::from_cents(resale),
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category_id: None,
            description: None,
            cost_price: Money::from_cents(50),
            sale_price: Money::from_cents(100),
            profit_margin: Decimal::new(50, 0),
            resale_price: Money::from_cents(200),
            resale_margin: Decimal::new(50, 0),
        }
    }

    #[test]
    fn test_assign_and_lookup() {
        let mut index = CustomPriceIndex::new();
        let entry = index.assign_custom_price("cli", "pao", prices(90, 150)).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("cli", "pao"), Some(&entry));
        assert!(index.lookup("other", "pao").is_none());
        assert_eq!(index.get(&entry.id), Some(&entry));
    }

    #[test]
    fn test_assign_rejects_resale_below_sale() {
        let mut index = CustomPriceIndex::new();
        let err = index.assign_custom_price("cli", "pao", prices(200, 150)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::LowerThan { .. })));
        assert!(index.is_empty());
    }

    #[test]
    fn test_assign_twice_is_a_duplicate() {
        let mut index = CustomPriceIndex::new();
        index.assign_custom_price("cli", "pao", prices(90, 150)).unwrap();
        let err = index.assign_custom_price("cli", "pao", prices(95, 150)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCustomPrice { .. }));
    }

    #[test]
    fn test_update_in_place() {
        let mut index = CustomPriceIndex::new();
        let entry = index.assign_custom_price("cli", "pao", prices(90, 150)).unwrap();

        index.update_custom_price(&entry.id, prices(80, 140)).unwrap();
        let updated = index.lookup("cli", "pao").unwrap();
        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.sale_price.cents(), 80);

        assert!(index.update_custom_price(&entry.id, prices(80, 70)).is_err());
        assert!(matches!(
            index.update_custom_price("missing", prices(80, 140)),
            Err(CoreError::CustomPriceNotFound(_))
        ));
    }

    #[test]
    fn test_remove_moves_back_to_catalog() {
        let mut index = CustomPriceIndex::new();
        let entry = index.assign_custom_price("cli", "pao", prices(90, 150)).unwrap();

        let removed = index.remove_custom_price(&entry.id).unwrap();
        assert_eq!(removed.id, entry.id);
        assert!(index.lookup("cli", "pao").is_none());
        assert!(index.remove_custom_price(&entry.id).is_err());
    }

    #[test]
    fn test_price_board_buckets() {
        let products = vec![product("pao"), product("bolo"), product("broa")];
        let mut index = CustomPriceIndex::new();
        index.assign_custom_price("cli", "bolo", prices(90, 150)).unwrap();
        index.assign_custom_price("other", "pao", prices(90, 150)).unwrap();

        let board = price_board(&products, "cli", &index);
        assert_eq!(board.custom.len(), 1);
        assert_eq!(board.custom[0].0.id, "bolo");
        assert_eq!(board.catalog.len(), 2);
    }

    #[test]
    fn test_for_client_is_sorted() {
        let mut index = CustomPriceIndex::new();
        index.assign_custom_price("cli", "sonho", prices(90, 150)).unwrap();
        index.assign_custom_price("cli", "broa", prices(90, 150)).unwrap();
        index.assign_custom_price("x", "bolo", prices(90, 150)).unwrap();

        let ids: Vec<&str> = index.for_client("cli").iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["broa", "sonho"]);
    }
}
