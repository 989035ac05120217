//! # Domain Types
//!
//! Core domain types shared by the console commands and the browser UI.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  CustomPrice    │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cost_price     │◄──│  product_id     │   │  id             │       │
//! │  │  sale_price     │   │  client_id      │──►│  name           │       │
//! │  │  profit_margin  │   │  sale_price     │   │  phone          │       │
//! │  │  resale_price   │   │  resale_price   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │  SaleLineItem   │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  status         │──►│  unit_price ❄   │   │  method         │       │
//! │  │  total          │   │  quantity       │   │  amount         │       │
//! │  │  payments       │   │  returns        │   │  paid_on        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ❄ = snapshot taken when the line enters the cart                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Client and Category are plain records passed through unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Client & Category
// =============================================================================

/// A bakery customer (usually a shop that resells the products).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Product category (Pães, Bolos, Salgados, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its full price sheet.
///
/// ## Invariants
/// - `sale_price ≥ cost_price ≥ 0.01`
/// - `resale_price ≥ sale_price`
/// - `profit_margin = (sale − cost) / sale × 100`
/// - `resale_margin = (resale − sale) / resale × 100`
///
/// The margins are kept consistent by [`crate::pricing::PriceSheet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub description: Option<String>,

    /// What the bakery pays to produce one unit.
    pub cost_price: Money,

    /// Minimum (catalog) sale price charged to clients.
    pub sale_price: Money,

    /// Profit margin percent over the sale price.
    #[ts(as = "String")]
    pub profit_margin: Decimal,

    /// Suggested shelf price for the reselling client.
    pub resale_price: Money,

    /// Client-facing margin percent over the resale price.
    #[ts(as = "String")]
    pub resale_margin: Decimal,
}

// =============================================================================
// Custom Price
// =============================================================================

/// Override price pair for one client × product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceOverride {
    pub sale_price: Money,
    pub resale_price: Money,
}

/// Per-client custom price for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomPrice {
    pub id: String,
    pub client_id: String,
    pub product_id: String,
    pub sale_price: Money,
    pub resale_price: Money,
}

impl CustomPrice {
    /// Returns the override prices as a pair.
    #[inline]
    pub fn prices(&self) -> PriceOverride {
        PriceOverride {
            sale_price: self.sale_price,
            resale_price: self.resale_price,
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The lifecycle status of a sale.
///
/// ```text
/// PENDENTE ──► PRODUZIDO ──► ENTREGUE ──► PAGO
///    │
///    └──► CANCELADO
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    /// Order received, not produced yet.
    Pendente,
    /// Baked and waiting for delivery.
    Produzido,
    /// Delivered, waiting for payment.
    Entregue,
    /// Paid and reconciled (terminal).
    Pago,
    /// Cancelled before production (terminal).
    Cancelado,
}

impl SaleStatus {
    /// All statuses in lifecycle order (used by filters and reports).
    pub const ALL: [SaleStatus; 5] = [
        SaleStatus::Pendente,
        SaleStatus::Produzido,
        SaleStatus::Entregue,
        SaleStatus::Pago,
        SaleStatus::Cancelado,
    ];

    /// Wire/display code.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pendente => "PENDENTE",
            SaleStatus::Produzido => "PRODUZIDO",
            SaleStatus::Entregue => "ENTREGUE",
            SaleStatus::Pago => "PAGO",
            SaleStatus::Cancelado => "CANCELADO",
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pendente
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    Credito,
    Debito,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Dinheiro => "DINHEIRO",
            PaymentMethod::Credito => "CREDITO",
            PaymentMethod::Debito => "DEBITO",
        };
        f.write_str(code)
    }
}

// =============================================================================
// Payment & Return
// =============================================================================

/// A payment towards a sale. A sale may be split across several payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub method: PaymentMethod,
    pub amount: Money,
    #[ts(as = "String")]
    pub paid_on: NaiveDate,
}

/// Units of a line item handed back by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReturn {
    pub line_item_id: String,
    pub quantity: i64,
    pub reason: String,
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product × quantity entry of a sale.
///
/// Uses the snapshot pattern: name and unit price are frozen when the
/// line is added, later catalog changes never touch a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineItem {
    pub id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen, custom price when one applied).
    pub unit_price: Money,
    /// Returns already recorded against this line.
    #[serde(default)]
    pub returns: Vec<SaleReturn>,
}

impl SaleLineItem {
    /// unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Units already returned on this line.
    pub fn returned_quantity(&self) -> i64 {
        self.returns.iter().map(|r| r.quantity).sum()
    }

    /// Units that can still be returned.
    pub fn returnable_quantity(&self) -> i64 {
        self.quantity - self.returned_quantity()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An order placed by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    /// Client name at time of sale, for listings.
    pub client_name: Option<String>,
    pub status: SaleStatus,
    pub items: Vec<SaleLineItem>,
    /// Σ line totals, fixed at creation.
    pub total: Money,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub settled_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Looks up a line item by id.
    pub fn line(&self, line_item_id: &str) -> Option<&SaleLineItem> {
        self.items.iter().find(|l| l.id == line_item_id)
    }

    /// Value of every return already recorded on the sale.
    pub fn returned_value(&self) -> Money {
        self.items
            .iter()
            .map(|l| l.unit_price.multiply_quantity(l.returned_quantity()))
            .sum()
    }

    /// Sum of recorded payments.
    pub fn paid_total(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Total quantity of units sold.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, qty: i64, unit_cents: i64, returned: &[i64]) -> SaleLineItem {
        SaleLineItem {
            id: id.to_string(),
            product_id: format!("prod-{}", id),
            product_name: format!("Produto {}", id),
            quantity: qty,
            unit_price: Money::from_cents(unit_cents),
            returns: returned
                .iter()
                .map(|q| SaleReturn {
                    line_item_id: id.to_string(),
                    quantity: *q,
                    reason: "avariado".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pendente);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&SaleStatus::Produzido).unwrap();
        assert_eq!(json, "\"PRODUZIDO\"");
        let parsed: SaleStatus = serde_json::from_str("\"CANCELADO\"").unwrap();
        assert_eq!(parsed, SaleStatus::Cancelado);
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::Dinheiro).unwrap();
        assert_eq!(json, "\"DINHEIRO\"");
        assert_eq!(PaymentMethod::Pix.to_string(), "PIX");
    }

    #[test]
    fn test_line_item_quantities() {
        let item = line("1", 5, 200, &[1, 2]);
        assert_eq!(item.line_total().cents(), 1000);
        assert_eq!(item.returned_quantity(), 3);
        assert_eq!(item.returnable_quantity(), 2);
    }
}
