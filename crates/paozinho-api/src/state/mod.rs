//! # Console State
//!
//! In-memory state shared by the console commands.
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │  CartState           │   │  PriceIndexState         │
//! │  Arc<Mutex<Cart>>    │   │  Arc<Mutex<PriceIndex>>  │
//! │  sale being built    │   │  custom prices loaded    │
//! └──────────────────────┘   └──────────────────────────┘
//! ```
//!
//! The remote API stays the source of truth; both holders are caches that
//! a command refreshes when it loads a form.

pub mod cart;
pub mod prices;

pub use cart::{CartSnapshot, CartState};
pub use prices::PriceIndexState;
