//! # paozinho-core: Pure Business Logic for the Pãozinho Delícia Console
//!
//! Everything the console checks locally before it talks to the remote API
//! lives here, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pãozinho Delícia Console                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │   Produtos ──► Preços Personalizados ──► Vendas ──► Dashboard   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    paozinho-api (commands)                      │   │
//! │  │   save_product, create_sale, settle_sale, login, ...            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ paozinho-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────────┐    │   │
//! │  │   │ pricing  │ │   cart   │ │lifecycle │ │ reconciliation │    │   │
//! │  │   │ margins  │ │  lines   │ │ statuses │ │ pay − returns  │    │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer centavos, BRL formatting
//! - [`types`] - Domain types (Product, Sale, Payment, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Form input parsing and field rules
//! - [`pricing`] - Margin ↔ price derivation and unit price resolution
//! - [`custom_price`] - Per-client price overrides
//! - [`cart`] - Sale line aggregator
//! - [`reconciliation`] - Payment/return balancing before settlement
//! - [`lifecycle`] - Sale status machine
//! - [`listing`] - Filters, pagination and table column schemas
//! - [`report`] - Dashboard aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use paozinho_core::pricing::derive_sale_price;
//! use paozinho_core::Money;
//! use rust_decimal::Decimal;
//!
//! // R$ 0,50 of cost with a 60% margin over the sale price
//! let price = derive_sale_price(Money::from_cents(50), Decimal::new(60, 0)).unwrap();
//! assert_eq!(price.to_string(), "R$ 1,25");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod custom_price;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod money;
pub mod pricing;
pub mod reconciliation;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use custom_price::CustomPriceIndex;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::PriceSheet;
pub use reconciliation::{ReconciliationPolicy, Settlement};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products in a single sale.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default settlement tolerance: one centavo.
pub const DEFAULT_TOLERANCE: Money = Money::from_cents(1);
