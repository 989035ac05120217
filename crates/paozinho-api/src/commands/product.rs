//! # Product Commands
//!
//! Catalog listing and the product form.
//!
//! ## Price Sheet Editing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Produto                                                                │
//! │                                                                         │
//! │  Custo        [ 0,50 ]  ──┐                                             │
//! │  Margem %     [ 60   ]  ──┼─► edit_price_sheet(sheet, field, "60")      │
//! │  Venda        [ 1,25 ]  ◄─┘        │                                    │
//! │  Margem rev.% [ 37,5 ]             │ recomputed sheet, nothing sent     │
//! │  Revenda      [ 2,00 ]  ◄──────────┘                                    │
//! │                                                                         │
//! │  [ Salvar ] ──► save_product(form) ──► validate ──► POST/PUT produtos   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use paozinho_core::listing::{paginate, Page, ProductFilter};
use paozinho_core::validation::{parse_margin, parse_money, validate_product_name};
use paozinho_core::{PriceSheet, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ConsoleResult;
use crate::Console;

/// Which price-sheet input the user just changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    CostPrice,
    ProfitMargin,
    SalePrice,
    ResaleMargin,
    ResalePrice,
}

/// Product form as submitted by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductForm {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub prices: PriceSheet,
}

/// Applies one typed edit to the sheet and returns the recomputed sheet.
///
/// Pure: the form calls it on every keystroke. An unparsable or
/// out-of-range input returns the error and the caller keeps its old sheet.
pub fn edit_price_sheet(mut sheet: PriceSheet, field: PriceField, input: &str) -> ConsoleResult<PriceSheet> {
    match field {
        PriceField::CostPrice => sheet.set_cost(parse_money("cost price", input)?)?,
        PriceField::ProfitMargin => sheet.set_profit_margin(parse_margin("profit margin", input)?)?,
        PriceField::SalePrice => sheet.set_sale_price(parse_money("sale price", input)?)?,
        PriceField::ResaleMargin => sheet.set_resale_margin(parse_margin("resale margin", input)?)?,
        PriceField::ResalePrice => sheet.set_resale_price(parse_money("resale price", input)?)?,
    }
    Ok(sheet)
}

impl ProductForm {
    /// Prices are what the user sees; margins that disagree with them are
    /// recomputed before anything is sent.
    fn into_product(self) -> ConsoleResult<Product> {
        validate_product_name(&self.name)?;
        self.prices.validate()?;
        let prices = self.prices.with_consistent_margins()?;

        Ok(Product {
            id: self.id.unwrap_or_default(),
            name: self.name.trim().to_string(),
            category_id: self.category_id.filter(|c| !c.is_empty()),
            description: self.description.filter(|d| !d.trim().is_empty()),
            cost_price: prices.cost_price,
            sale_price: prices.sale_price,
            profit_margin: prices.profit_margin,
            resale_price: prices.resale_price,
            resale_margin: prices.resale_margin,
        })
    }
}

/// One page of the catalog, filtered and ordered by name.
pub async fn list_products(console: &Console, filter: &ProductFilter, page: usize) -> ConsoleResult<Page<Product>> {
    debug!(?filter, page, "list_products command");

    let products = console.api().products().list().await?;
    let matching: Vec<Product> = filter.apply(&products).into_iter().cloned().collect();
    Ok(paginate(&matching, page, console.config().page_size()))
}

pub async fn get_product(console: &Console, id: &str) -> ConsoleResult<Product> {
    console.api().products().get(id).await
}

/// Validates the whole form, then creates or updates the product.
pub async fn save_product(console: &Console, form: ProductForm) -> ConsoleResult<Product> {
    debug!(name = %form.name, "save_product command");

    let product = form.into_product()?;
    let saved = if product.id.is_empty() {
        console.api().products().create(&product).await?
    } else {
        console.api().products().update(&product).await?
    };

    info!(product_id = %saved.id, sale_price = %saved.sale_price, "Product saved");
    Ok(saved)
}

pub async fn delete_product(console: &Console, id: &str) -> ConsoleResult<()> {
    debug!(product_id = %id, "delete_product command");
    console.api().products().delete(id).await?;
    info!(product_id = %id, "Product deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
