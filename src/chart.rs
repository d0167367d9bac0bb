//! Bar-chart projection of aggregated rows.
//!
//! The chart renderer is external; this module only produces the flat data
//! array it consumes, the series keys, and the index field.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::DEFAULT_CHART_INDEX;
use crate::error::Result;
use crate::models::{AggregatedRow, Dimension, MetricKey, SpendRow};

// ---------------------------------------------------------------------------
// ChartDatum
// ---------------------------------------------------------------------------

/// One bar group: the row's attribute values plus each selected metric's
/// `current` value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDatum {
    pub dimensions: Vec<(Dimension, String)>,
    pub values: Vec<(MetricKey, f64)>,
}

impl ChartDatum {
    pub fn value(&self, key: MetricKey) -> Option<f64> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Serializes as `{"sector": "retail", "My Spend": 120000.0}`; series are
/// keyed by metric label, as the chart's `keys` are.
impl Serialize for ChartDatum {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len() + self.values.len()))?;
        for (dim, value) in &self.dimensions {
            map.serialize_entry(dim.field(), value)?;
        }
        for (key, value) in &self.values {
            map.serialize_entry(key.label(), value)?;
        }
        map.end()
    }
}

/// Project rows onto chart data. Missing metrics chart as 0.
pub fn project(rows: &[AggregatedRow], metrics: &[MetricKey]) -> Vec<ChartDatum> {
    rows.iter()
        .map(|row| ChartDatum {
            dimensions: row.dimensions().to_vec(),
            values: metrics
                .iter()
                .map(|&key| (key, row.metric(key).map_or(0.0, |m| m.current)))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ChartModel
// ---------------------------------------------------------------------------

/// Everything the bar-chart renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub title: String,
    pub index_by: String,
    pub keys: Vec<String>,
    pub data: Vec<ChartDatum>,
}

impl ChartModel {
    pub fn project(rows: &[AggregatedRow], group_by: &[Dimension], metrics: &[MetricKey]) -> Self {
        let index_by = group_by
            .first()
            .map_or(DEFAULT_CHART_INDEX, |d| d.field())
            .to_string();
        let attrs = group_by
            .iter()
            .map(|d| d.field())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title: format!("Spend by: {}", attrs),
            index_by,
            keys: metrics.iter().map(|k| k.label().to_string()).collect(),
            data: project(rows, metrics),
        }
    }

    /// The renderer payload as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
