//! # Validation Module
//!
//! Input-boundary parsing and field validation.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── Raw text as typed: "1,25", "60", "abc", ""                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── parse_*: text → Money / Decimal / i64 or a field error            │
//! │  └── validate_*: typed value → business bounds                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Only ever receives values that passed layer 2                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A value that fails here never silently becomes zero.
//!
//! ## Usage
//! ```rust
//! use paozinho_core::validation::{parse_money, parse_quantity};
//!
//! assert_eq!(parse_money("preço", "1,25").unwrap().cents(), 125);
//! assert!(parse_quantity("2.5").is_err());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest price accepted anywhere in the catalog (R$ 0,01).
pub const MIN_PRICE: Money = Money::from_cents(1);

/// Largest single payment accepted (R$ 1.000.000,00).
pub const MAX_PAYMENT_AMOUNT: Money = Money::from_cents(100_000_000);

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (1-120 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 120)
}

/// Validates a client name (1-120 characters).
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_required_text("client name", name, 120)
}

/// Validates a return reason (required, max 500 characters).
pub fn validate_return_reason(reason: &str) -> ValidationResult<()> {
    validate_required_text("reason", reason, 500)
}

/// Validates optional sale notes (max 1000 characters).
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    match notes {
        Some(text) if text.chars().count() > 1000 => Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: 1000,
        }),
        _ => Ok(()),
    }
}

/// Validates a search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a decimal typed in a Brazilian form.
///
/// Accepts `1,25`, `1.25`, `1.234,56` and surrounding spaces. Rejects empty
/// input, `NaN`, infinities and anything `Decimal` cannot represent.
pub fn parse_decimal(field: &str, input: &str) -> ValidationResult<Decimal> {
    let raw = input.trim().trim_start_matches("R$").trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // "1.234,56" → "1234.56"; "1,25" → "1.25"; "1.25" stays
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };

    Decimal::from_str(&normalized).map_err(|_| ValidationError::NotANumber {
        field: field.to_string(),
    })
}

/// Parses a price field: at least R$ 0,01, rounded half-up to centavos.
pub fn parse_money(field: &str, input: &str) -> ValidationResult<Money> {
    let value = parse_decimal(field, input)?;
    let money = Money::from_decimal(value).ok_or_else(|| ValidationError::NotANumber {
        field: field.to_string(),
    })?;
    validate_price(field, money)?;
    Ok(money)
}

/// Parses a payment amount: zero or more.
pub fn parse_payment_amount(input: &str) -> ValidationResult<Money> {
    let value = parse_decimal("payment amount", input)?;
    let money = Money::from_decimal(value).ok_or_else(|| ValidationError::NotANumber {
        field: "payment amount".to_string(),
    })?;
    validate_payment_amount(money)?;
    Ok(money)
}

/// Parses a margin percent in `[0, 100)`, rounded half-up to 2 places.
///
/// "99,999" rounds to 100.00 and is rejected.
pub fn parse_margin(field: &str, input: &str) -> ValidationResult<Decimal> {
    let value = parse_decimal(field, input.trim().trim_end_matches('%'))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    validate_margin(field, value)?;
    Ok(value)
}

/// Parses a quantity typed by the user: a whole number between 1 and
/// [`MAX_ITEM_QUANTITY`].
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let raw = input.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty = raw.parse::<i64>().map_err(|_| {
        // "2.5" is a number, just not a whole one
        if parse_decimal("quantity", raw).is_ok() {
            ValidationError::NotAnInteger {
                field: "quantity".to_string(),
            }
        } else {
            ValidationError::NotANumber {
                field: "quantity".to_string(),
            }
        }
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (1..=MAX_ITEM_QUANTITY).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "1".to_string(),
            max: MAX_ITEM_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog price (≥ R$ 0,01).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if price < MIN_PRICE {
        return Err(ValidationError::BelowMinimum {
            field: field.to_string(),
            min: MIN_PRICE.to_string(),
        });
    }

    Ok(())
}

/// Validates a payment amount (0..=MAX_PAYMENT_AMOUNT).
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "payment amount".to_string(),
        });
    }

    if amount > MAX_PAYMENT_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "payment amount".to_string(),
            min: Money::zero().to_string(),
            max: MAX_PAYMENT_AMOUNT.to_string(),
        });
    }

    Ok(())
}

/// Validates a margin percent in `[0, 100)`.
pub fn validate_margin(field: &str, margin: Decimal) -> ValidationResult<()> {
    if margin.is_sign_negative() && !margin.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if margin >= Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "99.99".to_string(),
        });
    }

    Ok(())
}

/// Validates that `value ≥ floor`, naming both fields on failure.
pub fn validate_not_lower(field: &str, value: Money, other: &str, floor: Money) -> ValidationResult<()> {
    if value < floor {
        return Err(ValidationError::LowerThan {
            field: field.to_string(),
            other: other.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
