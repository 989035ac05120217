//! # Sale Lifecycle
//!
//! ```text
//! PENDENTE ──► PRODUZIDO ──► ENTREGUE ──► PAGO
//!    │                           settle() runs reconciliation first
//!    └──► CANCELADO
//! ```
//!
//! Every method checks the edge first and leaves the sale untouched on error.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::reconciliation::{reconcile, ReconciliationPolicy, Settlement};
use crate::types::{Payment, Sale, SaleReturn, SaleStatus};

impl SaleStatus {
    /// Whether `self → to` is an edge of the lifecycle.
    pub fn can_transition_to(&self, to: SaleStatus) -> bool {
        matches!(
            (self, to),
            (SaleStatus::Pendente, SaleStatus::Produzido)
                | (SaleStatus::Produzido, SaleStatus::Entregue)
                | (SaleStatus::Entregue, SaleStatus::Pago)
                | (SaleStatus::Pendente, SaleStatus::Cancelado)
        )
    }

    /// Next status along the main path, `None` for terminal states.
    pub fn next(&self) -> Option<SaleStatus> {
        match self {
            SaleStatus::Pendente => Some(SaleStatus::Produzido),
            SaleStatus::Produzido => Some(SaleStatus::Entregue),
            SaleStatus::Entregue => Some(SaleStatus::Pago),
            SaleStatus::Pago | SaleStatus::Cancelado => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SaleStatus::Pago | SaleStatus::Cancelado)
    }
}

impl Sale {
    fn check_transition(&self, to: SaleStatus) -> CoreResult<()> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                sale_id: self.id.clone(),
                from: self.status,
                to,
            })
        }
    }

    /// Moves PENDENTE → PRODUZIDO or PRODUZIDO → ENTREGUE.
    ///
    /// ENTREGUE → PAGO is refused here: it must go through [`Sale::settle`].
    pub fn advance(&mut self) -> CoreResult<SaleStatus> {
        let to = self.status.next().unwrap_or(self.status);
        if to == SaleStatus::Pago {
            return Err(CoreError::InvalidTransition {
                sale_id: self.id.clone(),
                from: self.status,
                to,
            });
        }

        self.check_transition(to)?;
        self.status = to;
        info!(sale_id = %self.id, status = %to, "Sale advanced");
        Ok(to)
    }

    /// PENDENTE → CANCELADO. Any other starting state is an error.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.check_transition(SaleStatus::Cancelado)?;
        self.status = SaleStatus::Cancelado;
        info!(sale_id = %self.id, "Sale cancelled");
        Ok(())
    }

    /// ENTREGUE → PAGO after a successful reconciliation.
    ///
    /// On success the returns are attached to their lines and the payments
    /// replace the recorded ones.
    pub fn settle(
        &mut self,
        returns: Vec<SaleReturn>,
        payments: Vec<Payment>,
        policy: &ReconciliationPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<Settlement> {
        self.check_transition(SaleStatus::Pago)?;
        let settlement = reconcile(self, &returns, &payments, policy)?;

        for ret in returns {
            if let Some(line) = self.items.iter_mut().find(|l| l.id == ret.line_item_id) {
                line.returns.push(ret);
            }
        }
        self.payments = payments;
        self.status = SaleStatus::Pago;
        self.settled_at = Some(now);

        info!(sale_id = %self.id, paid = %settlement.paid_total, "Sale settled");
        Ok(settlement)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
