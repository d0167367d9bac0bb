//! Column ordering for aggregated rows.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;
use crate::models::{Dimension, MetricKey, SpendRow, SubField};

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// A sortable column: a bare attribute, or one sub-field of one metric.
///
/// Parses from `"sector"` or `"<metric>_<subfield>"`, where the metric part
/// is a field name or label (`"mySpend_current"`, `"My Spend_reference"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Dimension(Dimension),
    Metric(MetricKey, SubField),
}

impl SortKey {
    /// The canonical token, e.g. `"sector"` or `"mySpend_percentChange"`.
    pub fn token(&self) -> String {
        match self {
            SortKey::Dimension(dim) => dim.field().to_string(),
            SortKey::Metric(key, sub) => format!("{}_{}", key.field(), sub.field()),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Dimension(Dimension::Sector)
    }
}

impl FromStr for SortKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((metric, sub)) = s.rsplit_once('_') {
            if let (Some(key), Ok(sub)) = (MetricKey::resolve(metric), sub.parse::<SubField>()) {
                return Ok(SortKey::Metric(key, sub));
            }
        }
        s.parse::<Dimension>()
            .map(SortKey::Dimension)
            .map_err(|_| AnalyticsError::InvalidArgument(format!("unknown sort key '{}'", s)))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AnalyticsError::InvalidArgument(format!(
                "unknown sort order '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SortState
// ---------------------------------------------------------------------------

/// The active sort column and direction of the metrics table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Handle a click on a column header.
    ///
    /// Clicking the active ascending column flips it to descending; any
    /// other click sorts that column ascending.
    pub fn request(&mut self, key: SortKey) {
        let is_asc = self.key == key && self.order == SortOrder::Asc;
        self.order = if is_asc { SortOrder::Desc } else { SortOrder::Asc };
        self.key = key;
    }

    pub fn is_active(&self, key: SortKey) -> bool {
        self.key == key
    }

    /// Direction arrow for a header: the live order on the active column,
    /// ascending elsewhere.
    pub fn direction_for(&self, key: SortKey) -> SortOrder {
        if self.is_active(key) {
            self.order
        } else {
            SortOrder::Asc
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// NaN sorts as zero.
fn sort_value(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Order `a` before `b` when `a` holds the larger value.
fn descending<R: SpendRow + ?Sized>(a: &R, b: &R, key: SortKey) -> Ordering {
    match key {
        SortKey::Metric(metric, sub) => {
            let av = sort_value(a.metric(metric).map_or(0.0, |m| m.get(sub)));
            let bv = sort_value(b.metric(metric).map_or(0.0, |m| m.get(sub)));
            bv.total_cmp(&av)
        }
        SortKey::Dimension(dim) => {
            let av = a.dimension(dim).unwrap_or("");
            let bv = b.dimension(dim).unwrap_or("");
            bv.cmp(av)
        }
    }
}

/// Compare two rows on `key`. Ascending is the reverse of descending.
pub fn compare<R: SpendRow + ?Sized>(a: &R, b: &R, key: SortKey, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Desc => descending(a, b, key),
        SortOrder::Asc => descending(a, b, key).reverse(),
    }
}

/// Sort rows on `key`, breaking ties by input position.
///
/// The tie-break is applied after the direction, so equal rows keep their
/// input order in both directions.
pub fn stable_sort<R: SpendRow>(rows: &[R], key: SortKey, order: SortOrder) -> Vec<&R> {
    let mut indexed: Vec<(usize, &R)> = rows.iter().enumerate().collect();
    indexed.sort_unstable_by(|(ia, a), (ib, b)| compare(*a, *b, key, order).then(ia.cmp(ib)));
    indexed.into_iter().map(|(_, row)| row).collect()
}
