//! Grouped sums over a (filtered) table, one function per dashboard chart.
//!
//! All views are pure and deterministic: groups are sorted by key, null keys
//! are skipped and a null Sales cell adds nothing. Every view of an empty
//! table is empty.

use arrow::array::Array;
use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::schema::CanonicalColumn;
use crate::table::CanonicalTable;

/// Sales summed for one value of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`, sorts chronologically.
    pub period: String,
    /// `YYYY : Mon`, as shown on the time-series axis.
    pub label: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub region: String,
    pub category: String,
    pub sub_category: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesProfitPoint {
    pub sales: f64,
    pub profit: f64,
    pub quantity: Option<i64>,
}

/// Mean Sales of one sub-category in one calendar month, all years pooled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCell {
    pub sub_category: String,
    pub month: String,
    #[serde(skip)]
    pub month_number: u32,
    pub average_sales: f64,
}

/// One line of the data preview table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub region: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub sales: Option<f64>,
    pub profit: Option<f64>,
    pub quantity: Option<i64>,
}

fn sales_at(table: &CanonicalTable, row: usize) -> Option<f64> {
    let sales = table.sales();
    sales.is_valid(row).then(|| sales.value(row))
}

fn totals_by(table: &CanonicalTable, col: CanonicalColumn) -> Vec<GroupTotal> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for row in 0..table.num_rows() {
        if let Some(key) = table.text(col, row) {
            *groups.entry(key).or_insert(0.0) += sales_at(table, row).unwrap_or(0.0);
        }
    }
    groups
        .into_iter()
        .map(|(key, sales)| GroupTotal {
            key: key.to_string(),
            sales,
        })
        .collect()
}

pub fn category_totals(table: &CanonicalTable) -> Vec<GroupTotal> {
    totals_by(table, CanonicalColumn::Category)
}

pub fn region_totals(table: &CanonicalTable) -> Vec<GroupTotal> {
    totals_by(table, CanonicalColumn::Region)
}

pub fn segment_totals(table: &CanonicalTable) -> Vec<GroupTotal> {
    totals_by(table, CanonicalColumn::Segment)
}

fn month_abbrev(month: u32) -> &'static str {
    Month::try_from(month as u8)
        .map(|m| &m.name()[..3])
        .unwrap_or("???")
}

pub fn monthly_series(table: &CanonicalTable) -> Vec<MonthlyPoint> {
    let mut groups: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let date: NaiveDate = table.order_date(row);
        *groups.entry((date.year(), date.month())).or_insert(0.0) +=
            sales_at(table, row).unwrap_or(0.0);
    }
    groups
        .into_iter()
        .map(|((year, month), sales)| MonthlyPoint {
            period: format!("{:04}-{:02}", year, month),
            label: format!("{} : {}", year, month_abbrev(month)),
            sales,
        })
        .collect()
}

pub fn hierarchy(table: &CanonicalTable) -> Vec<HierarchyNode> {
    let mut groups: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let key = (
            table.text(CanonicalColumn::Region, row),
            table.text(CanonicalColumn::Category, row),
            table.text(CanonicalColumn::SubCategory, row),
        );
        if let (Some(r), Some(c), Some(s)) = key {
            *groups.entry((r, c, s)).or_insert(0.0) += sales_at(table, row).unwrap_or(0.0);
        }
    }
    groups
        .into_iter()
        .map(|((region, category, sub_category), sales)| HierarchyNode {
            region: region.to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales,
        })
        .collect()
}

/// Row-level points for the Sales vs Profit scatter, sized by Quantity.
pub fn sales_profit_pairs(table: &CanonicalTable) -> Vec<SalesProfitPoint> {
    let (sales, profit, qty) = (table.sales(), table.profit(), table.quantity());
    (0..table.num_rows())
        .filter(|&row| sales.is_valid(row) && profit.is_valid(row))
        .map(|row| SalesProfitPoint {
            sales: sales.value(row),
            profit: profit.value(row),
            quantity: qty.is_valid(row).then(|| qty.value(row)),
        })
        .collect()
}

/// Mean Sales per (Sub-Category, month name); months January..December.
pub fn subcategory_month_pivot(table: &CanonicalTable) -> Vec<PivotCell> {
    let mut groups: BTreeMap<(&str, u32), (f64, usize)> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let (Some(sub), Some(sales)) = (
            table.text(CanonicalColumn::SubCategory, row),
            sales_at(table, row),
        ) else {
            continue;
        };
        let slot = groups
            .entry((sub, table.order_date(row).month()))
            .or_insert((0.0, 0));
        slot.0 += sales;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|((sub, month), (sum, count))| PivotCell {
            sub_category: sub.to_string(),
            month: Month::try_from(month as u8)
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            month_number: month,
            average_sales: sum / count as f64,
        })
        .collect()
}

/// The first `n` rows, restricted to the columns shown in the summary table.
pub fn preview(table: &CanonicalTable, n: usize) -> Vec<PreviewRow> {
    let (sales, profit, qty) = (table.sales(), table.profit(), table.quantity());
    let text = |col, row| table.text(col, row).map(str::to_string);
    (0..table.num_rows().min(n))
        .map(|row| PreviewRow {
            region: text(CanonicalColumn::Region, row),
            state: text(CanonicalColumn::State, row),
            city: text(CanonicalColumn::City, row),
            category: text(CanonicalColumn::Category, row),
            sales: sales.is_valid(row).then(|| sales.value(row)),
            profit: profit.is_valid(row).then(|| profit.value(row)),
            quantity: qty.is_valid(row).then(|| qty.value(row)),
        })
        .collect()
}

/// Every view the dashboard renders, computed from one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Views {
    pub category_totals: Vec<GroupTotal>,
    pub region_totals: Vec<GroupTotal>,
    pub monthly_series: Vec<MonthlyPoint>,
    pub hierarchy: Vec<HierarchyNode>,
    pub segment_totals: Vec<GroupTotal>,
    pub sales_profit_pairs: Vec<SalesProfitPoint>,
    pub subcategory_month_pivot: Vec<PivotCell>,
    pub preview: Vec<PreviewRow>,
}

impl Views {
    pub fn compute(table: &CanonicalTable, preview_rows: usize) -> Self {
        Self {
            category_totals: category_totals(table),
            region_totals: region_totals(table),
            monthly_series: monthly_series(table),
            hierarchy: hierarchy(table),
            segment_totals: segment_totals(table),
            sales_profit_pairs: sales_profit_pairs(table),
            subcategory_month_pivot: subcategory_month_pivot(table),
            preview: preview(table, preview_rows),
        }
    }
}
