//! # Custom Price Commands
//!
//! The per-client price board. Dragging a product from the catalog column
//! to the custom column calls [`assign_custom_price`]; dragging it back
//! calls [`remove_custom_price`]. Both check locally before any request.

use paozinho_core::custom_price::{price_board, validate_override};
use paozinho_core::{CoreError, CustomPrice, PriceOverride, Product};
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ConsoleResult;
use crate::Console;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CustomPriceRow {
    pub product: Product,
    pub custom_price: CustomPrice,
}

/// The two columns of a client's price board.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PriceBoardView {
    pub client_id: String,
    pub custom: Vec<CustomPriceRow>,
    pub catalog: Vec<Product>,
}

/// Fetches products and custom prices, refreshes the cache and splits the
/// catalog for `client_id`.
pub async fn load_price_board(console: &Console, client_id: &str) -> ConsoleResult<PriceBoardView> {
    debug!(client_id = %client_id, "load_price_board command");

    let api = console.api();
    let (product_repo, custom_price_repo) = (api.products(), api.custom_prices());
    let (mut products, custom_prices) = tokio::try_join!(product_repo.list(), custom_price_repo.list())?;
    products.sort_by_key(|p| p.name.to_lowercase());
    console.prices().replace(custom_prices);

    let view = console.prices().with_index(|index| {
        let board = price_board(&products, client_id, index);
        PriceBoardView {
            client_id: client_id.to_string(),
            custom: board
                .custom
                .into_iter()
                .map(|(product, custom_price)| CustomPriceRow {
                    product: product.clone(),
                    custom_price: custom_price.clone(),
                })
                .collect(),
            catalog: board.catalog.into_iter().cloned().collect(),
        }
    });

    Ok(view)
}

/// Creates an override for client × product.
///
/// Refused locally when the prices are invalid or the pair already has one.
pub async fn assign_custom_price(
    console: &Console,
    client_id: &str,
    product_id: &str,
    prices: PriceOverride,
) -> ConsoleResult<CustomPrice> {
    debug!(client_id = %client_id, product_id = %product_id, "assign_custom_price command");

    validate_override(&prices)?;
    if console.prices().with_index(|index| index.lookup(client_id, product_id).is_some()) {
        return Err(CoreError::DuplicateCustomPrice {
            client_id: client_id.to_string(),
            product_id: product_id.to_string(),
        }
        .into());
    }

    let draft = CustomPrice {
        id: String::new(),
        client_id: client_id.to_string(),
        product_id: product_id.to_string(),
        sale_price: prices.sale_price,
        resale_price: prices.resale_price,
    };
    let created = console.api().custom_prices().create(&draft).await?;
    console.prices().with_index_mut(|index| index.insert(created.clone()))?;

    info!(custom_price_id = %created.id, sale_price = %created.sale_price, "Custom price assigned");
    Ok(created)
}

pub async fn update_custom_price(
    console: &Console,
    custom_price_id: &str,
    prices: PriceOverride,
) -> ConsoleResult<CustomPrice> {
    debug!(custom_price_id = %custom_price_id, "update_custom_price command");

    validate_override(&prices)?;
    let mut entry = console
        .prices()
        .with_index(|index| index.get(custom_price_id).cloned())
        .ok_or_else(|| CoreError::CustomPriceNotFound(custom_price_id.to_string()))?;
    entry.sale_price = prices.sale_price;
    entry.resale_price = prices.resale_price;

    let saved = console.api().custom_prices().update(&entry).await?;
    console
        .prices()
        .with_index_mut(|index| index.update_custom_price(custom_price_id, saved.prices()).map(|_| ()))?;

    info!(custom_price_id = %custom_price_id, "Custom price updated");
    Ok(saved)
}

/// Deletes the override; the product falls back to catalog pricing.
pub async fn remove_custom_price(console: &Console, custom_price_id: &str) -> ConsoleResult<()> {
    debug!(custom_price_id = %custom_price_id, "remove_custom_price command");

    if console.prices().with_index(|index| index.get(custom_price_id).is_none()) {
        return Err(CoreError::CustomPriceNotFound(custom_price_id.to_string()).into());
    }

    console.api().custom_prices().delete(custom_price_id).await?;
    console
        .prices()
        .with_index_mut(|index| index.remove_custom_price(custom_price_id).map(|_| ()))?;

    info!(custom_price_id = %custom_price_id, "Custom price removed");
    Ok(())
}
