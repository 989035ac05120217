//! # Sale Commands
//!
//! ## Sale Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Workflow                                    │
//! │                                                                         │
//! │  load_sale_form ──► add_to_cart / set_cart_quantity ──► create_sale     │
//! │                                                             │           │
//! │                                                   POST vendas (PENDENTE)│
//! │                                                             │           │
//! │  advance_sale ──► PATCH status PRODUZIDO ──► PATCH status ENTREGUE      │
//! │                                                             │           │
//! │  preview_settlement (live, nothing sent)                    │           │
//! │  settle_sale ──► reconcile ──► POST vendas/{id}/pagamento ──► PAGO      │
//! │                                                                         │
//! │  cancel_sale (PENDENTE only) ──► PATCH status CANCELADO                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition and every settlement is checked against the local copy
//! of the sale first. A refused check never reaches the API.

use chrono::{NaiveDate, Utc};
use paozinho_core::listing::{paginate, Page, SaleFilter};
use paozinho_core::reconciliation::preview;
use paozinho_core::validation::{parse_payment_amount, parse_quantity};
use paozinho_core::{Client, Payment, PaymentMethod, Product, Sale, SaleReturn, SaleStatus, Settlement};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ConsoleResult;
use crate::state::CartSnapshot;
use crate::Console;

// =============================================================================
// Payloads
// =============================================================================

/// Everything the "Nova Venda" form needs to render.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SaleFormData {
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleRequest {
    pub client_id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
}

/// A payment row as typed in the settlement dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    /// "5,00", "R$ 3,00", ...
    pub amount: String,
    #[ts(as = "String")]
    pub paid_on: NaiveDate,
}

impl PaymentInput {
    fn parse(&self) -> ConsoleResult<Payment> {
        Ok(Payment {
            method: self.method,
            amount: parse_payment_amount(&self.amount)?,
            paid_on: self.paid_on,
        })
    }
}

fn parse_payments(inputs: &[PaymentInput]) -> ConsoleResult<Vec<Payment>> {
    inputs.iter().map(PaymentInput::parse).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettlementRequest {
    pub sale_id: String,
    #[serde(default)]
    pub returns: Vec<SaleReturn>,
    pub payments: Vec<PaymentInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SettlementResult {
    pub sale: Sale,
    pub settlement: Settlement,
}

// =============================================================================
// Sale Form & Cart
// =============================================================================

/// Loads clients, products and custom prices in parallel.
///
/// The custom price cache is refreshed so the cart resolves current prices.
pub async fn load_sale_form(console: &Console) -> ConsoleResult<SaleFormData> {
    debug!("load_sale_form command");

    let api = console.api();
    let (client_repo, product_repo, custom_price_repo) = (api.clients(), api.products(), api.custom_prices());
    let (mut clients, mut products, custom_prices) = tokio::try_join!(
        client_repo.list(),
        product_repo.list(),
        custom_price_repo.list()
    )?;
    clients.sort_by_key(|c| c.name.to_lowercase());
    products.sort_by_key(|p| p.name.to_lowercase());
    console.prices().replace(custom_prices);

    Ok(SaleFormData { clients, products })
}

pub fn get_cart(console: &Console) -> CartSnapshot {
    console.cart().snapshot()
}

/// Adds one unit of a product, resolving the client's price.
pub async fn add_to_cart(console: &Console, client_id: &str, product_id: &str) -> ConsoleResult<CartSnapshot> {
    debug!(client_id = %client_id, product_id = %product_id, "add_to_cart command");

    let product = console.api().products().get(product_id).await?;
    let prices = console.prices();
    console
        .cart()
        .with_cart_mut(|cart| prices.with_index(|index| cart.add_line(&product, client_id, index)))?;

    Ok(console.cart().snapshot())
}

/// Sets a line quantity from the raw input. Any zero ("0", "00") removes the line.
pub fn set_cart_quantity(console: &Console, product_id: &str, raw: &str) -> ConsoleResult<CartSnapshot> {
    debug!(product_id = %product_id, raw = %raw, "set_cart_quantity command");

    match cart_edit(raw)? {
        CartEdit::Remove => console.cart().with_cart_mut(|cart| cart.remove_line(product_id))?,
        CartEdit::Quantity(quantity) => console
            .cart()
            .with_cart_mut(|cart| cart.set_quantity(product_id, quantity))?,
    }

    Ok(console.cart().snapshot())
}

#[derive(Debug, PartialEq, Eq)]
enum CartEdit {
    Remove,
    Quantity(i64),
}

/// Zero removes; negatives and anything else fall through to the quantity rules.
fn cart_edit(raw: &str) -> ConsoleResult<CartEdit> {
    match raw.trim().parse::<i64>() {
        Ok(0) => Ok(CartEdit::Remove),
        _ => Ok(CartEdit::Quantity(parse_quantity(raw)?)),
    }
}

pub fn remove_from_cart(console: &Console, product_id: &str) -> ConsoleResult<CartSnapshot> {
    console.cart().with_cart_mut(|cart| cart.remove_line(product_id))?;
    Ok(console.cart().snapshot())
}

pub fn clear_cart(console: &Console) -> CartSnapshot {
    console.cart().with_cart_mut(|cart| cart.clear());
    console.cart().snapshot()
}

/// Submits the cart as a PENDENTE sale.
///
/// The cart is only cleared once the API accepted the sale, so a failed
/// request leaves the form as the user filled it.
pub async fn create_sale(console: &Console, request: NewSaleRequest) -> ConsoleResult<Sale> {
    debug!(client_id = %request.client_id, "create_sale command");

    let draft = console.cart().with_cart(|cart| cart.clone()).into_new_sale(
        &request.client_id,
        request.client_name,
        request.notes,
        request.sale_date,
    )?;

    let created = console.api().sales().create(&draft).await?;
    console.cart().with_cart_mut(|cart| cart.clear());

    Ok(created)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// PENDENTE → PRODUZIDO or PRODUZIDO → ENTREGUE.
pub async fn advance_sale(console: &Console, sale_id: &str) -> ConsoleResult<Sale> {
    debug!(sale_id = %sale_id, "advance_sale command");

    let mut sale = console.api().sales().get(sale_id).await?;
    let to = sale.advance()?;

    let updated = console.api().sales().update_status(sale_id, to).await?;
    info!(sale_id = %sale_id, status = %updated.status, "Sale status updated");
    Ok(updated)
}

/// PENDENTE → CANCELADO.
pub async fn cancel_sale(console: &Console, sale_id: &str) -> ConsoleResult<Sale> {
    debug!(sale_id = %sale_id, "cancel_sale command");

    let mut sale = console.api().sales().get(sale_id).await?;
    sale.cancel()?;

    let updated = console
        .api()
        .sales()
        .update_status(sale_id, SaleStatus::Cancelado)
        .await?;
    info!(sale_id = %sale_id, "Sale cancelled");
    Ok(updated)
}

// =============================================================================
// Settlement
// =============================================================================

/// Live figures for the settlement dialog. Nothing is sent.
pub async fn preview_settlement(console: &Console, request: &SettlementRequest) -> ConsoleResult<Settlement> {
    let sale = console.api().sales().get(&request.sale_id).await?;
    let payments = parse_payments(&request.payments)?;
    Ok(preview(&sale, &request.returns, &payments)?)
}

/// Records returns and payments, moving the sale ENTREGUE → PAGO.
///
/// The reconciliation runs on a local copy first; a mismatch returns the
/// signed difference ("missing: R$ 0,50") without calling the API.
pub async fn settle_sale(console: &Console, request: SettlementRequest) -> ConsoleResult<SettlementResult> {
    debug!(sale_id = %request.sale_id, payments = request.payments.len(), "settle_sale command");

    let payments = parse_payments(&request.payments)?;
    let sale = console.api().sales().get(&request.sale_id).await?;

    let policy = console.config().reconciliation_policy();
    let settlement = sale
        .clone()
        .settle(request.returns.clone(), payments.clone(), &policy, Utc::now())?;

    let settled = console
        .api()
        .sales()
        .settle(&request.sale_id, &payments, &request.returns)
        .await?;

    info!(
        sale_id = %settled.id,
        paid = %settlement.paid_total,
        returned = %settlement.returned_value,
        "Sale paid"
    );
    Ok(SettlementResult {
        sale: settled,
        settlement,
    })
}

// =============================================================================
// Listing
// =============================================================================

/// One page of the sales list, most recent first.
pub async fn list_sales(console: &Console, filter: &SaleFilter, page: usize) -> ConsoleResult<Page<Sale>> {
    debug!(?filter, page, "list_sales command");

    let sales = console.api().sales().list().await?;
    let matching: Vec<Sale> = filter.apply(&sales).into_iter().cloned().collect();
    Ok(paginate(&matching, page, console.config().page_size()))
}

pub async fn get_sale(console: &Console, sale_id: &str) -> ConsoleResult<Sale> {
    console.api().sales().get(sale_id).await
}

// =============================================================================
// Unit Tests
// =============================================================================
