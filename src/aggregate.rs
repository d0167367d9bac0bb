//! Grouping of spend rows into summary rows.
//!
//! Rows are bucketed by a [`GroupKey`] built from the selected attributes,
//! and every selected metric's four sub-fields are summed per bucket.
//! Buckets come back in first-seen order.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{AggregatedRow, Dimension, GroupKey, MetricKey, SpendRow};

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Output of [`Aggregator::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation<'a, R> {
    /// No grouping was requested; the input is handed back untouched.
    Passthrough(&'a [R]),
    /// One summary row per distinct group key, in first-seen order.
    Grouped(Vec<AggregatedRow>),
}

impl<'a, R> Aggregation<'a, R> {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Aggregation::Passthrough(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Aggregation::Passthrough(rows) => rows.len(),
            Aggregation::Grouped(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The summary rows, or `None` for a passthrough.
    pub fn grouped(&self) -> Option<&[AggregatedRow]> {
        match self {
            Aggregation::Passthrough(_) => None,
            Aggregation::Grouped(rows) => Some(rows),
        }
    }

    pub fn into_grouped(self) -> Option<Vec<AggregatedRow>> {
        match self {
            Aggregation::Passthrough(_) => None,
            Aggregation::Grouped(rows) => Some(rows),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Groups rows by an ordered list of attributes and sums the selected metrics.
///
/// The selection is resolved once at construction, so aggregation itself
/// never matches names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    group_by: Vec<Dimension>,
    metrics: Vec<MetricKey>,
}

impl Aggregator {
    /// Create an aggregator. Duplicate attributes or metrics are dropped.
    pub fn new(group_by: &[Dimension], metrics: &[MetricKey]) -> Self {
        let mut dims = Vec::with_capacity(group_by.len());
        for &dim in group_by {
            if !dims.contains(&dim) {
                dims.push(dim);
            }
        }
        let mut keys = Vec::with_capacity(metrics.len());
        for &key in metrics {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self {
            group_by: dims,
            metrics: keys,
        }
    }

    /// Create an aggregator from attribute and metric names.
    ///
    /// Unknown attributes are an error. Unknown metrics are logged and
    /// skipped; see [`MetricKey::resolve_all`].
    pub fn from_names<G, M>(group_by: &[G], metrics: &[M]) -> Result<Self>
    where
        G: AsRef<str>,
        M: AsRef<str>,
    {
        let dims = Dimension::parse_all(group_by)?;
        let keys = MetricKey::resolve_all(metrics);
        Ok(Self::new(&dims, &keys))
    }

    pub fn group_by(&self) -> &[Dimension] {
        &self.group_by
    }

    pub fn metrics(&self) -> &[MetricKey] {
        &self.metrics
    }

    /// Fold `rows` into summary rows.
    ///
    /// With no grouping attributes the input is returned as-is. A metric
    /// that is absent on a row is skipped for that row with a warning; it
    /// never aborts the pass.
    pub fn aggregate<'a, R: SpendRow>(&self, rows: &'a [R]) -> Aggregation<'a, R> {
        if self.group_by.is_empty() {
            return Aggregation::Passthrough(rows);
        }

        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<AggregatedRow> = Vec::new();

        for row in rows {
            let key = GroupKey::for_row(row, &self.group_by);
            let slot = *index.entry(key).or_insert_with_key(|key| {
                groups.push(AggregatedRow::seed(key, &self.group_by, &self.metrics));
                groups.len() - 1
            });
            let group = &mut groups[slot];

            for &metric in &self.metrics {
                let Some(source) = row.metric(metric) else {
                    log::warn!(
                        "metric \"{}\" is missing or not an object on a row in group \"{}\"; skipping",
                        metric.label(),
                        group.label()
                    );
                    continue;
                };
                if let Some(total) = group.metric_mut(metric) {
                    total.accumulate(source);
                }
            }
        }

        log::debug!(
            "aggregated {} rows into {} groups by [{}]",
            rows.len(),
            groups.len(),
            self.group_by
                .iter()
                .map(|d| d.field())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Aggregation::Grouped(groups)
    }
}
