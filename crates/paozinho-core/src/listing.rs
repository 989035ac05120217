//! # Listing
//!
//! Filters, pagination and the declarative column schemas consumed by the
//! generic table component.
//!
//! ```text
//! remote list ──► Filter::apply ──► paginate(page, size) ──► Page<T> ──► table
//!                                                              ▲
//!                                           SALE_COLUMNS ──────┘
//! ```
//!
//! The schema names *what* a column holds through [`ColumnKind`]; the table
//! picks the renderer for each kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, Sale, SaleStatus};

// =============================================================================
// Filters
// =============================================================================

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Filter bar of the sales list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub client_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    /// Inclusive.
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
    /// Matched against client name and notes, case-insensitive.
    pub text: Option<String>,
}

impl SaleFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        if self.status.is_some_and(|s| s != sale.status) {
            return false;
        }
        if self.client_id.as_deref().is_some_and(|id| id != sale.client_id) {
            return false;
        }
        if self.from.is_some_and(|d| sale.sale_date < d) {
            return false;
        }
        if self.to.is_some_and(|d| sale.sale_date > d) {
            return false;
        }

        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                sale.client_name
                    .as_deref()
                    .is_some_and(|n| contains_folded(n, &needle))
                    || sale.notes.as_deref().is_some_and(|n| contains_folded(n, &needle))
            }
        }
    }

    /// Matching sales, most recent sale date first.
    pub fn apply<'a>(&self, sales: &'a [Sale]) -> Vec<&'a Sale> {
        let mut out: Vec<&Sale> = sales.iter().filter(|s| self.matches(s)).collect();
        out.sort_by(|a, b| b.sale_date.cmp(&a.sale_date).then_with(|| b.created_at.cmp(&a.created_at)));
        out
    }
}

/// Filter bar of the product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    /// Matched against the product name, case-insensitive.
    pub text: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category_id.as_deref() {
            if product.category_id.as_deref() != Some(category) {
                return false;
            }
        }

        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(text) => contains_folded(&product.name, &text.to_lowercase()),
        }
    }

    /// Matching products ordered by name.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut out: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        out.sort_by_key(|p| p.name.to_lowercase());
        out
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped to `1..=total_pages`.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// At least 1, so an empty list still shows "page 1 of 1".
    pub total_pages: usize,
}

/// Cuts `items` into pages of `page_size` and returns page `page`.
///
/// Out-of-range pages are clamped rather than returning nothing, so a
/// filter that shrinks the list keeps the user on a valid page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

// =============================================================================
// Column Schemas
// =============================================================================

/// What a column holds. The table maps each kind to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    /// BRL amount.
    Money,
    /// Margin percent, colored by thresholds.
    Percent,
    Quantity,
    Date,
    /// Sale status badge.
    Status,
    /// Row buttons (edit, delete, advance).
    Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl ColumnSpec {
    const fn new(id: &'static str, label: &'static str, kind: ColumnKind, sortable: bool) -> Self {
        ColumnSpec {
            id,
            label,
            kind,
            sortable,
        }
    }
}

pub const SALE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("sale_date", "Data", ColumnKind::Date, true),
    ColumnSpec::new("client_name", "Cliente", ColumnKind::Text, true),
    ColumnSpec::new("total", "Total", ColumnKind::Money, true),
    ColumnSpec::new("status", "Status", ColumnKind::Status, true),
    ColumnSpec::new("actions", "Ações", ColumnKind::Actions, false),
];

pub const PRODUCT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("name", "Nome", ColumnKind::Text, true),
    ColumnSpec::new("cost_price", "Preço de Custo", ColumnKind::Money, true),
    ColumnSpec::new("sale_price", "Preço de Venda", ColumnKind::Money, true),
    ColumnSpec::new("profit_margin", "Margem", ColumnKind::Percent, true),
    ColumnSpec::new("resale_price", "Preço de Revenda", ColumnKind::Money, true),
    ColumnSpec::new("actions", "Ações", ColumnKind::Actions, false),
];

pub const CLIENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("name", "Nome", ColumnKind::Text, true),
    ColumnSpec::new("phone", "Telefone", ColumnKind::Text, false),
    ColumnSpec::new("email", "E-mail", ColumnKind::Text, false),
    ColumnSpec::new("actions", "Ações", ColumnKind::Actions, false),
];

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sale(id: &str, status: SaleStatus, day: u32, client: &str) -> Sale {
        Sale {
            id: id.to_string(),
            client_id: client.to_lowercase(),
            client_name: Some(client.to_string()),
            status,
            items: Vec::new(),
            total: Money::from_cents(1000),
            notes: Some("entregar cedo".to_string()),
            sale_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            payments: Vec::new(),
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    fn product(name: &str, category: Option<&str>) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            category_id: category.map(str::to_string),
            description: None,
            cost_price: Money::from_cents(50),
            sale_price: Money::from_cents(100),
            profit_margin: Decimal::new(50, 0),
            resale_price: Money::from_cents(150),
            resale_margin: Decimal::new(3333, 2),
        }
    }

    #[test]
    fn test_sale_filter_status_and_dates() {
        let sales = vec![
            sale("a", SaleStatus::Pendente, 1, "Mercearia Silva"),
            sale("b", SaleStatus::Pago, 10, "Padaria Central"),
            sale("c", SaleStatus::Pendente, 20, "Padaria Central"),
        ];

        let filter = SaleFilter {
            status: Some(SaleStatus::Pendente),
            ..Default::default()
        };
        let ids: Vec<&str> = filter.apply(&sales).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        let filter = SaleFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 5),
            to: NaiveDate::from_ymd_opt(2024, 3, 20),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales).len(), 2);
    }

    #[test]
    fn test_sale_filter_text_is_case_insensitive() {
        let sales = vec![
            sale("a", SaleStatus::Pendente, 1, "Mercearia Silva"),
            sale("b", SaleStatus::Pago, 10, "Padaria Central"),
        ];
        let filter = SaleFilter {
            text: Some("  padaria ".to_string()),
            ..Default::default()
        };
        let hits = filter.apply(&sales);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");

        let by_notes = SaleFilter {
            text: Some("CEDO".to_string()),
            ..Default::default()
        };
        assert_eq!(by_notes.apply(&sales).len(), 2);
    }

    #[test]
    fn test_product_filter() {
        let products = vec![
            product("Sonho", Some("doces")),
            product("Pão Francês", Some("paes")),
            product("Pão de Queijo", Some("salgados")),
        ];

        let filter = ProductFilter {
            text: Some("pão".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&products).len(), 2);

        let filter = ProductFilter {
            category_id: Some("doces".to_string()),
            text: None,
        };
        let hits = filter.apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Sonho");
    }

    #[test]
    fn test_paginate() {
        let items: Vec<i32> = (1..=23).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23]);

        let clamped = paginate(&items, 9, 10);
        assert_eq!(clamped.page, 3);

        let empty = paginate::<i32>(&[], 1, 10);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 1);
        assert_eq!(empty.page, 1);
    }

    #[test]
    fn test_column_schema_serializes_kind() {
        let json = serde_json::to_value(SALE_COLUMNS[2]).unwrap();
        assert_eq!(json["id"], "total");
        assert_eq!(json["kind"], "money");
        assert!(SALE_COLUMNS.iter().any(|c| c.kind == ColumnKind::Status));
    }
}
