use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use super::metric::{MetricKey, SpendMetric};
use super::record::Dimension;
use crate::config::GROUP_KEY_DELIMITER;

// ---------------------------------------------------------------------------
// SpendRow — Anything that can be grouped and sorted
// ---------------------------------------------------------------------------

/// Read access shared by raw records and aggregated rows.
pub trait SpendRow {
    /// The attribute value, or `None` if this row does not carry it.
    fn dimension(&self, dimension: Dimension) -> Option<&str>;

    /// The metric, or `None` if it is absent on this row.
    fn metric(&self, key: MetricKey) -> Option<&SpendMetric>;
}

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// Composite identity of an aggregated row: the lower-cased attribute values
/// in grouping order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    /// Build the key for `row` over `group_by`. Missing attributes read as `""`.
    pub fn for_row<R: SpendRow + ?Sized>(row: &R, group_by: &[Dimension]) -> Self {
        GroupKey(
            group_by
                .iter()
                .map(|&dim| row.dimension(dim).unwrap_or("").to_lowercase())
                .collect(),
        )
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(GROUP_KEY_DELIMITER))
    }
}

// ---------------------------------------------------------------------------
// AggregatedRow
// ---------------------------------------------------------------------------

/// One summary row: the grouped attribute values plus the summed metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    dimensions: Vec<(Dimension, String)>,
    metrics: Vec<(MetricKey, SpendMetric)>,
}

impl AggregatedRow {
    pub fn new(dimensions: Vec<(Dimension, String)>, metrics: Vec<(MetricKey, SpendMetric)>) -> Self {
        Self { dimensions, metrics }
    }

    /// A fresh row for `key` with every selected metric zeroed.
    pub(crate) fn seed(key: &GroupKey, group_by: &[Dimension], metrics: &[MetricKey]) -> Self {
        Self {
            dimensions: group_by
                .iter()
                .copied()
                .zip(key.values().iter().cloned())
                .collect(),
            metrics: metrics
                .iter()
                .map(|&m| (m, SpendMetric::default()))
                .collect(),
        }
    }

    pub fn dimensions(&self) -> &[(Dimension, String)] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[(MetricKey, SpendMetric)] {
        &self.metrics
    }

    pub(crate) fn metric_mut(&mut self, key: MetricKey) -> Option<&mut SpendMetric> {
        self.metrics
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, m)| m)
    }

    /// The row's group key rendered as one string, e.g. `"india | retail"`.
    pub fn label(&self) -> String {
        self.dimensions
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(GROUP_KEY_DELIMITER)
    }
}

impl SpendRow for AggregatedRow {
    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, v)| v.as_str())
    }

    fn metric(&self, key: MetricKey) -> Option<&SpendMetric> {
        self.metrics
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, m)| m)
    }
}

/// Serializes as a flat object: `{"sector": "retail", "mySpend": {...}}`.
impl Serialize for AggregatedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len() + self.metrics.len()))?;
        for (dim, value) in &self.dimensions {
            map.serialize_entry(dim.field(), value)?;
        }
        for (key, metric) in &self.metrics {
            map.serialize_entry(key.field(), metric)?;
        }
        map.end()
    }
}
