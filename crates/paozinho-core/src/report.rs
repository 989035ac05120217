//! # Dashboard Report
//!
//! Aggregates a list of sales into the figures the dashboard charts show.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Sale, SaleStatus};

/// Number of products listed in [`SalesReport::top_products`].
pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusSummary {
    pub status: SaleStatus,
    pub count: usize,
    /// Σ sale totals (before returns).
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    /// Units sold net of returns.
    pub quantity: i64,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "Option<(String, String)>")]
    pub period: Option<(NaiveDate, NaiveDate)>,
    pub sale_count: usize,
    /// One entry per status, in lifecycle order.
    pub by_status: Vec<StatusSummary>,
    /// PAGO sales, net of returns.
    pub received_total: Money,
    /// ENTREGUE sales waiting for payment.
    pub outstanding_total: Money,
    /// Value of everything returned on PAGO sales.
    pub returned_value: Money,
    pub top_products: Vec<ProductSales>,
}

impl SalesReport {
    /// Builds the report over `sales` whose date falls in `period` (inclusive).
    ///
    /// Cancelled sales are counted per status but left out of product totals.
    pub fn build(sales: &[Sale], period: Option<(NaiveDate, NaiveDate)>) -> Self {
        let in_period: Vec<&Sale> = sales
            .iter()
            .filter(|s| period.map_or(true, |(from, to)| s.sale_date >= from && s.sale_date <= to))
            .collect();

        let by_status = SaleStatus::ALL
            .iter()
            .map(|status| {
                let matching = in_period.iter().filter(|s| s.status == *status);
                StatusSummary {
                    status: *status,
                    count: matching.clone().count(),
                    value: matching.map(|s| s.total).sum(),
                }
            })
            .collect();

        let paid: Vec<&&Sale> = in_period.iter().filter(|s| s.status == SaleStatus::Pago).collect();
        let returned_value: Money = paid.iter().map(|s| s.returned_value()).sum();
        let received_total = paid.iter().map(|s| s.total).sum::<Money>() - returned_value;
        let outstanding_total = in_period
            .iter()
            .filter(|s| s.status == SaleStatus::Entregue)
            .map(|s| s.total)
            .sum();

        let mut products: HashMap<&str, ProductSales> = HashMap::new();
        for sale in in_period.iter().filter(|s| s.status != SaleStatus::Cancelado) {
            for line in &sale.items {
                let net = line.quantity - line.returned_quantity();
                let entry = products
                    .entry(line.product_id.as_str())
                    .or_insert_with(|| ProductSales {
                        product_id: line.product_id.clone(),
                        product_name: line.product_name.clone(),
                        quantity: 0,
                        value: Money::zero(),
                    });
                entry.quantity += net;
                entry.value += line.unit_price.multiply_quantity(net);
            }
        }

        let mut top_products: Vec<ProductSales> = products.into_values().collect();
        top_products.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| b.value.cmp(&a.value))
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        top_products.truncate(TOP_PRODUCTS);

        SalesReport {
            period,
            sale_count: in_period.len(),
            by_status,
            received_total,
            outstanding_total,
            returned_value,
            top_products,
        }
    }

    pub fn status(&self, status: SaleStatus) -> Option<&StatusSummary> {
        self.by_status.iter().find(|s| s.status == status)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
