//! View model for the grouped metrics table.
//!
//! Produces headers, sort indicators, and display-ready cell text for the
//! current page. Drawing the table is left to the host UI.

use serde::Serialize;

use crate::config::PAGE_SIZE_OPTIONS;
use crate::models::{AggregatedRow, Dimension, MetricKey, SpendRow, SubField};
use crate::pagination::Pagination;
use crate::sort::{stable_sort, SortKey, SortOrder, SortState};

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: SortKey,
    pub header: String,
    pub active: bool,
    pub direction: SortOrder,
}

/// Attribute columns first, then four columns per metric.
pub fn columns(group_by: &[Dimension], metrics: &[MetricKey], sort: &SortState) -> Vec<Column> {
    let dims = group_by
        .iter()
        .map(|&dim| (SortKey::Dimension(dim), dim.label().to_string()));
    let subs = metrics.iter().flat_map(|&metric| {
        SubField::TABLE_ORDER.into_iter().map(move |sub| {
            (
                SortKey::Metric(metric, sub),
                format!("{} {}", metric.label(), sub.header_suffix()),
            )
        })
    });
    dims.chain(subs)
        .map(|(key, header)| Column {
            key,
            header,
            active: sort.is_active(key),
            direction: sort.direction_for(key),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

/// Render a metric sub-field: percentages with two decimals and a `%`
/// sign, everything else as a grouped amount.
pub fn format_cell(sub: SubField, value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    match sub {
        SubField::PercentChange => format!("{:.2}%", value),
        _ => format_amount(value),
    }
}

/// en-US style amount: comma thousands separators and at most three
/// fraction digits with trailing zeros dropped (`1234567.5` -> `1,234,567.5`).
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn row_cells(row: &AggregatedRow, group_by: &[Dimension], metrics: &[MetricKey]) -> Vec<String> {
    let dims = group_by
        .iter()
        .map(|&dim| row.dimension(dim).unwrap_or("").to_string());
    let subs = metrics.iter().flat_map(|&metric| {
        let spend = row.metric(metric).copied().unwrap_or_default();
        SubField::TABLE_ORDER
            .into_iter()
            .map(move |sub| format_cell(sub, spend.get(sub)))
    });
    dims.chain(subs).collect()
}

// ---------------------------------------------------------------------------
// TableModel
// ---------------------------------------------------------------------------

/// One rendered page of the metrics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub page_size_options: Vec<usize>,
}

impl TableModel {
    /// Sort `rows`, cut the current page, and format its cells.
    pub fn build(
        rows: &[AggregatedRow],
        group_by: &[Dimension],
        metrics: &[MetricKey],
        sort: &SortState,
        pagination: &Pagination,
    ) -> Self {
        let sorted = stable_sort(rows, sort.key, sort.order);
        let page = pagination
            .slice(&sorted)
            .iter()
            .map(|row| row_cells(row, group_by, metrics))
            .collect();

        Self {
            columns: columns(group_by, metrics, sort),
            rows: page,
            total_rows: rows.len(),
            page: pagination.page(),
            page_size: pagination.page_size(),
            page_count: pagination.page_count(rows.len()),
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}
