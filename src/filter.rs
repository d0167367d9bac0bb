//! Record filter with chainable construction.
//!
//! A filter narrows a record slice by exact sector, exact category, and
//! date-range overlap. A record missing either date never matches a date
//! range. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use spend_analytics::{DateRange, RecordFilter};
//!
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//! )
//! .unwrap();
//! let mut filter = RecordFilter::new();
//! filter.sector("Retail").category("Juice").date_range(range);
//! assert!(!filter.is_passthrough());
//! ```

use std::borrow::Cow;

use crate::models::{DateRange, Record};

/// Narrows records by sector, category, and date overlap.
///
/// Every condition is optional. With none set the filter is a passthrough
/// and [`apply`](RecordFilter::apply) hands back the input slice itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    sector: Option<String>,
    category: Option<String>,
    date_range: Option<DateRange>,
}

impl RecordFilter {
    /// Create a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records whose sector equals `sector` exactly.
    ///
    /// An empty string clears the condition.
    pub fn sector(&mut self, sector: &str) -> &mut Self {
        self.sector = non_empty(sector);
        self
    }

    /// Keep records whose category equals `category` exactly.
    ///
    /// An empty string clears the condition.
    pub fn category(&mut self, category: &str) -> &mut Self {
        self.category = non_empty(category);
        self
    }

    /// Keep records whose own period overlaps `range`.
    pub fn date_range(&mut self, range: DateRange) -> &mut Self {
        self.date_range = Some(range);
        self
    }

    /// True when no condition is set.
    pub fn is_passthrough(&self) -> bool {
        self.sector.is_none() && self.category.is_none() && self.date_range.is_none()
    }

    /// Test a single record against every condition.
    pub fn matches(&self, record: &Record) -> bool {
        let in_sector = self.sector.as_deref().map_or(true, |s| record.sector == s);
        let in_category = self
            .category
            .as_deref()
            .map_or(true, |c| record.category == c);
        let in_range = self
            .date_range
            .map_or(true, |r| {
                record
                    .period()
                    .is_some_and(|period| r.overlaps(period.start, period.end))
            });
        in_sector && in_category && in_range
    }

    /// Apply the filter, preserving input order.
    ///
    /// Returns the input slice borrowed when the filter is a passthrough.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Cow<'a, [Record]> {
        if self.is_passthrough() {
            return Cow::Borrowed(records);
        }
        let kept: Vec<Record> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        log::debug!("filter kept {} of {} records", kept.len(), records.len());
        Cow::Owned(kept)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
