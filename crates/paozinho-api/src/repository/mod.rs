//! # Repository Module
//!
//! One repository per REST resource of the bakery API.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Console command                                                        │
//! │       │                                                                 │
//! │       │  api.products().list()                                          │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list(&self)                                                        │
//! │  ├── get(&self, id)                                                     │
//! │  ├── create(&self, product)                                             │
//! │  └── update(&self, product)                                             │
//! │       │                                                                 │
//! │       │  GET/POST/PUT/DELETE produtos[/id]   (JSON DTOs)                │
//! │       ▼                                                                 │
//! │  Remote API                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories speak domain types; DTO conversion happens inside them.
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`] - `clientes`
//! - [`CategoryRepository`] - `categorias`
//! - [`ProductRepository`] - `produtos`
//! - [`CustomPriceRepository`] - `precos-personalizados`
//! - [`SaleRepository`] - `vendas`, status and settlement

pub mod category;
pub mod client;
pub mod custom_price;
pub mod product;
pub mod sale;

pub use category::CategoryRepository;
pub use client::ClientRepository;
pub use custom_price::CustomPriceRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;

use crate::error::{ConsoleError, ConsoleResult};

/// Converts a list of wire records, failing on the first unusable one.
pub(crate) fn convert_all<D, T>(items: Vec<D>) -> ConsoleResult<Vec<T>>
where
    T: TryFrom<D, Error = ConsoleError>,
{
    items.into_iter().map(T::try_from).collect()
}
