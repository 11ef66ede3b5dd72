//! # Dashboard & Report Figures
//!
//! Pure aggregations over already-loaded products and movements.
//!
//! ```text
//! ┌──────────────────────────┐      ┌────────────────────────────────────┐
//! │     DashboardSummary     │      │          InventoryReport           │
//! │  total_products          │      │  everything in the dashboard       │
//! │  total_units             │  ⊂   │  value_at_cost  Σ qty × cost       │
//! │  out_of_stock            │      │  value_at_price Σ qty × price      │
//! │  recent_movements (5)    │      │  products, recent_movements (30)   │
//! └──────────────────────────┘      └────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Movement, Product};
use crate::{DASHBOARD_RECENT_MOVEMENTS, REPORT_RECENT_MOVEMENTS};

/// Page size of the product table.
pub const PRODUCTS_PAGE_SIZE: usize = 5;

/// Page size of the movement table.
pub const MOVEMENTS_PAGE_SIZE: usize = 10;

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_units: i64,
    pub out_of_stock: usize,
    pub low_stock: usize,
    pub recent_movements: Vec<Movement>,
}

impl DashboardSummary {
    /// Builds the dashboard figures.
    ///
    /// `movements` may come in any order; the newest are picked here.
    pub fn compute(products: &[Product], movements: &[Movement], low_stock_threshold: i64) -> Self {
        Self {
            total_products: products.len(),
            total_units: total_units(products),
            out_of_stock: products.iter().filter(|p| p.is_out_of_stock()).count(),
            low_stock: low_stock(products, low_stock_threshold).len(),
            recent_movements: most_recent(movements, DASHBOARD_RECENT_MOVEMENTS),
        }
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryReport {
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub total_products: usize,
    pub total_units: i64,
    pub out_of_stock: usize,
    pub value_at_cost_cents: i64,
    pub value_at_price_cents: i64,
    pub products: Vec<Product>,
    pub recent_movements: Vec<Movement>,
}

impl InventoryReport {
    pub fn compute(products: &[Product], movements: &[Movement], generated_at: DateTime<Utc>) -> Self {
        let value_at_cost: Money = products
            .iter()
            .map(|p| p.cost().multiply_quantity(p.quantity))
            .sum();
        let value_at_price: Money = products
            .iter()
            .map(|p| p.price().multiply_quantity(p.quantity))
            .sum();

        Self {
            generated_at,
            total_products: products.len(),
            total_units: total_units(products),
            out_of_stock: products.iter().filter(|p| p.is_out_of_stock()).count(),
            value_at_cost_cents: value_at_cost.cents(),
            value_at_price_cents: value_at_price.cents(),
            products: products.to_vec(),
            recent_movements: most_recent(movements, REPORT_RECENT_MOVEMENTS),
        }
    }

    /// Expected margin if the whole stock sells at list price.
    pub fn potential_margin(&self) -> Money {
        Money::from_cents(self.value_at_price_cents) - Money::from_cents(self.value_at_cost_cents)
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn total_units(products: &[Product]) -> i64 {
    products.iter().map(|p| p.quantity).sum()
}

/// Products strictly below `threshold`, lowest stock first.
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<&Product> {
    let mut low: Vec<&Product> = products.iter().filter(|p| p.quantity < threshold).collect();
    low.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.name.cmp(&b.name)));
    low
}

/// The `limit` newest movements (date desc, time desc).
pub fn most_recent(movements: &[Movement], limit: usize) -> Vec<Movement> {
    let mut sorted: Vec<&Movement> = movements.iter().collect();
    sorted.sort_by(|a, b| {
        (b.date, b.time, b.created_at).cmp(&(a.date, a.time, a.created_at))
    });
    sorted.into_iter().take(limit).cloned().collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a table. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

/// Slices `items` into the requested page.
///
/// Out-of-range pages are clamped to the nearest valid one; an empty input
/// yields page 1 of 0.
///
/// ```rust
/// use inventics_core::summary::paginate;
///
/// let page = paginate(&[1, 2, 3, 4, 5, 6, 7], 2, 5);
/// assert_eq!(page.items, vec![6, 7]);
/// assert_eq!(page.total_pages, 2);
/// ```
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;

    Page {
        page,
        total_pages,
        total_items: items.len(),
        items: items.iter().skip(start).take(page_size).cloned().collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovementType, Unit};
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn product(name: &str, quantity: i64, cost: i64, price: i64) -> Product {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Product {
            id: format!("id-{name}"),
            code: "001".to_string(),
            name: name.to_string(),
            category: "Abarrotes".to_string(),
            supplier: "Proveedor".to_string(),
            quantity,
            unit: Unit::Units,
            presentation: None,
            cost_cents: cost,
            price_cents: price,
            entry_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_url: String::new(),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn movement(day: u32, hour: u32) -> Movement {
        Movement {
            id: format!("m-{day}-{hour}"),
            product_id: "p".to_string(),
            product_name: "Arroz".to_string(),
            movement_type: MovementType::Inbound,
            quantity: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            user: "ana".to_string(),
            reason: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_dashboard_counts() {
        let products = vec![
            product("Arroz", 10, 100, 150),
            product("Azúcar", 0, 80, 120),
            product("Café", 70, 900, 1300),
        ];
        let movements: Vec<Movement> = (1..=8).map(|d| movement(d, 9)).collect();

        let summary = DashboardSummary::compute(&products, &movements, 50);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_units, 80);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(summary.low_stock, 2);
        assert_eq!(summary.recent_movements.len(), 5);
        assert_eq!(summary.recent_movements[0].id, "m-8-9");
    }

    #[test]
    fn test_report_values() {
        let products = vec![product("Arroz", 10, 100, 150), product("Café", 2, 900, 1300)];
        let generated_at = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();

        let report = InventoryReport::compute(&products, &[], generated_at);
        assert_eq!(report.value_at_cost_cents, 10 * 100 + 2 * 900);
        assert_eq!(report.value_at_price_cents, 10 * 150 + 2 * 1300);
        assert_eq!(report.potential_margin().cents(), 1300);
        assert_eq!(report.generated_at, generated_at);
        assert!(report.recent_movements.is_empty());
    }

    #[test]
    fn test_most_recent_orders_by_date_then_time() {
        let movements = vec![movement(2, 8), movement(3, 7), movement(3, 18)];
        let recent = most_recent(&movements, 2);
        assert_eq!(recent[0].id, "m-3-18");
        assert_eq!(recent[1].id, "m-3-7");
    }

    #[test]
    fn test_low_stock_is_strictly_below_threshold() {
        let products = vec![product("B", 50, 0, 0), product("A", 49, 0, 0), product("C", 3, 0, 0)];
        let low = low_stock(&products, 50);
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<i32> = (1..=12).collect();

        let first = paginate(&items, 1, MOVEMENTS_PAGE_SIZE);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);

        let clamped = paginate(&items, 9, MOVEMENTS_PAGE_SIZE);
        assert_eq!(clamped.page, 2);
        assert_eq!(clamped.items, vec![11, 12]);

        let empty = paginate::<i32>(&[], 1, PRODUCTS_PAGE_SIZE);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }
}
