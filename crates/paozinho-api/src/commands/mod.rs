//! # Console Commands
//!
//! The operations behind each screen of the console.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs           ◄─── You are here (exports)
//! ├── auth.rs          ◄─── Login / logout
//! ├── client.rs        ◄─── Clients and categories
//! ├── product.rs       ◄─── Catalog, price sheet edits
//! ├── custom_price.rs  ◄─── Per-client price board
//! ├── sale.rs          ◄─── Nova Venda form, status changes, settlement
//! └── dashboard.rs     ◄─── Report figures
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  browser ──► command(&Console, args)                                    │
//! │                   │                                                     │
//! │                   ├── parse/validate input (paozinho-core)              │
//! │                   │        └── Err ──► Notice, nothing sent             │
//! │                   │                                                     │
//! │                   ├── repository call (ApiClient)                       │
//! │                   │        └── Err ──► Notice (401 also logs out)       │
//! │                   │                                                     │
//! │                   └── Ok(T) ──► JSON to the browser                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod client;
pub mod custom_price;
pub mod dashboard;
pub mod product;
pub mod sale;
