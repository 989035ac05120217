//! # Error Types
//!
//! Domain-specific error types for paozinho-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  paozinho-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing, cart, lifecycle, settlement failures   │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  paozinho-api errors (separate crate)                                  │
//! │  └── ConsoleError     - Remote failures + what the toast shows         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConsoleError → Notice → Browser    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is recoverable and local: it blocks a submission,
//! nothing is ever sent to the remote API with an invalid value.

use thiserror::Error;

use crate::money::Money;
use crate::types::SaleStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Margin derivation with a zero (or negative) sale price.
    #[error("Sale price must be greater than zero to derive a margin")]
    ZeroSalePrice,

    /// Price derivation with a margin of 100% or more.
    ///
    /// `price = cost / (1 − margin/100)` has no positive solution there.
    #[error("Margin must be below 100% (got {margin}%)")]
    MarginTooHigh { margin: String },

    /// A derived price or a settlement total no longer fits in the money
    /// representation.
    #[error("Amount is out of range")]
    PriceOutOfRange,

    /// Product referenced by the cart or a custom price is unknown.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Custom price entry referenced by id does not exist.
    #[error("Custom price not found: {0}")]
    CustomPriceNotFound(String),

    /// A client already holds an override for this product.
    #[error("Client {client_id} already has a custom price for product {product_id}")]
    DuplicateCustomPrice {
        client_id: String,
        product_id: String,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Sale cannot be created from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The requested status change is not an edge of the sale lifecycle.
    #[error("Sale {sale_id} cannot move from {from} to {to}")]
    InvalidTransition {
        sale_id: String,
        from: SaleStatus,
        to: SaleStatus,
    },

    /// A return references a line item the sale does not have.
    #[error("Return references unknown line item {0}")]
    UnknownLineItem(String),

    /// Returned quantity for a line exceeds what was sold on it.
    #[error("Return exceeds sold quantity for product {product_name}: sold {sold}, returned {returned}")]
    ReturnExceedsSold {
        product_name: String,
        sold: i64,
        returned: i64,
    },

    /// Payments do not match the post-return total.
    ///
    /// `difference` is `paid − payable`: negative means money is missing.
    #[error("{}", describe_imbalance(*difference))]
    PaymentMismatch { difference: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Renders a signed settlement difference as the console shows it.
///
/// ## Example
/// ```rust
/// use paozinho_core::error::describe_imbalance;
/// use paozinho_core::Money;
///
/// assert_eq!(describe_imbalance(Money::from_cents(-50)), "missing: R$ 0,50");
/// assert_eq!(describe_imbalance(Money::from_cents(120)), "excess: R$ 1,20");
/// ```
pub fn describe_imbalance(difference: Money) -> String {
    if difference.is_negative() {
        format!("missing: {}", difference.abs())
    } else {
        format!("excess: {}", difference)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is not a finite number (NaN, infinity, garbage text).
    #[error("{field} must be a number")]
    NotANumber { field: String },

    #[error("{field} must be a whole number")]
    NotAnInteger { field: String },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} must not be negative")]
    Negative { field: String },

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Cross-field ordering rule (resale ≥ sale, sale ≥ cost).
    #[error("{field} must not be lower than {other}")]
    LowerThan { field: String, other: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotANumber { field }
            | ValidationError::NotAnInteger { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::LowerThan { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_return_message_names_product() {
        let err = CoreError::ReturnExceedsSold {
            product_name: "Pão de Queijo".to_string(),
            sold: 2,
            returned: 3,
        };
        assert!(err.to_string().starts_with("Return exceeds sold quantity for product Pão de Queijo"));
    }

    #[test]
    fn test_mismatch_messages() {
        let missing = CoreError::PaymentMismatch {
            difference: Money::from_cents(-50),
        };
        assert_eq!(missing.to_string(), "missing: R$ 0,50");

        let excess = CoreError::PaymentMismatch {
            difference: Money::from_cents(75),
        };
        assert_eq!(excess.to_string(), "excess: R$ 0,75");
    }

    #[test]
    fn test_validation_field_name() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.field(), "quantity");
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
