//! # Payment/Return Reconciliation
//!
//! Gates `ENTREGUE → PAGO`: the payments handed in must cover the sale total
//! minus the value of what the client gave back.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  returns ──► group by line ──► Σ qty ≤ sold? ──► returned_value         │
//! │                                    │ no                                 │
//! │                                    └──► ReturnExceedsSold(product)      │
//! │                                                                         │
//! │  payable = total − returned_value                                       │
//! │  paid    = Σ payment.amount                                             │
//! │                                                                         │
//! │  |paid − payable| ≤ tolerance ──► Settlement                            │
//! │                         else  ──► PaymentMismatch("missing: R$ X")      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs in memory before the settlement request is built, so a
//! rejected settlement never reaches the remote API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Payment, Sale, SaleReturn};
use crate::validation::{validate_payment_amount, validate_return_reason};
use crate::DEFAULT_TOLERANCE;

/// How strict the balance check is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    /// Largest accepted |paid − payable|.
    pub tolerance: Money,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        ReconciliationPolicy {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ReconciliationPolicy {
    pub fn with_tolerance(tolerance: Money) -> Self {
        ReconciliationPolicy {
            tolerance: tolerance.abs(),
        }
    }
}

/// The figures shown in the settlement dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    /// Value of every return on the sale (recorded and proposed).
    pub returned_value: Money,
    /// `sale.total − returned_value`.
    pub payable_total: Money,
    /// Σ proposed payments.
    pub paid_total: Money,
    /// `paid_total − payable_total`; negative means money is missing.
    pub difference: Money,
}

impl Settlement {
    pub fn is_balanced(&self, policy: &ReconciliationPolicy) -> bool {
        self.difference.abs() <= policy.tolerance
    }
}

/// Computes the settlement figures without applying the tolerance.
///
/// Used for the live "faltando / excedente" indicator while the user types;
/// over-returns and invalid amounts are still errors.
pub fn preview(sale: &Sale, returns: &[SaleReturn], payments: &[Payment]) -> CoreResult<Settlement> {
    let mut proposed: HashMap<&str, i64> = HashMap::new();

    for ret in returns {
        if ret.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "return quantity".to_string(),
            }
            .into());
        }
        validate_return_reason(&ret.reason)?;
        let total = proposed.entry(ret.line_item_id.as_str()).or_insert(0);
        // Saturates past any sold quantity and is reported as an over-return below
        *total = total.saturating_add(ret.quantity);
    }

    let mut returned_value = sale.returned_value();

    if let Some(unknown) = proposed.keys().find(|id| sale.line(id).is_none()) {
        return Err(CoreError::UnknownLineItem(unknown.to_string()));
    }

    // Sale order keeps the reported product stable when several lines fail
    for line in &sale.items {
        let Some(quantity) = proposed.get(line.id.as_str()) else {
            continue;
        };

        let returned = line.returned_quantity().saturating_add(*quantity);
        if returned > line.quantity {
            return Err(CoreError::ReturnExceedsSold {
                product_name: line.product_name.clone(),
                sold: line.quantity,
                returned,
            });
        }

        let value = line
            .unit_price
            .cents()
            .checked_mul(*quantity)
            .map(Money::from_cents)
            .ok_or(CoreError::PriceOutOfRange)?;
        returned_value = returned_value.checked_add(value).ok_or(CoreError::PriceOutOfRange)?;
    }

    for payment in payments {
        validate_payment_amount(payment.amount)?;
    }

    let payable_total = sale
        .total
        .checked_sub(returned_value)
        .ok_or(CoreError::PriceOutOfRange)?;
    let paid_total =
        Money::checked_sum(payments.iter().map(|p| p.amount)).ok_or(CoreError::PriceOutOfRange)?;
    let difference = paid_total
        .checked_sub(payable_total)
        .ok_or(CoreError::PriceOutOfRange)?;

    Ok(Settlement {
        returned_value,
        payable_total,
        paid_total,
        difference,
    })
}

/// Runs the full check. `Ok` means the settlement may be submitted.
pub fn reconcile(
    sale: &Sale,
    returns: &[SaleReturn],
    payments: &[Payment],
    policy: &ReconciliationPolicy,
) -> CoreResult<Settlement> {
    let settlement = preview(sale, returns, payments)?;

    if !settlement.is_balanced(policy) {
        warn!(
            sale_id = %sale.id,
            payable = %settlement.payable_total,
            paid = %settlement.paid_total,
            "Settlement rejected"
        );
        return Err(CoreError::PaymentMismatch {
            difference: settlement.difference,
        });
    }

    debug!(sale_id = %sale.id, paid = %settlement.paid_total, "Settlement balanced");
    Ok(settlement)
}

// =============================================================================
// Unit Tests
// =============================================================================
