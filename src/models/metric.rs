use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

// ---------------------------------------------------------------------------
// SpendMetric — One measured quantity compared against a reference period
// ---------------------------------------------------------------------------

/// A spend figure for a period alongside its reference-period comparison.
///
/// The four fields are independent: `percent_change` is never re-derived
/// from the others, and aggregation sums each field on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendMetric {
    #[serde(default, deserialize_with = "lenient_number")]
    pub current: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reference: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub absolute_change: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percent_change: f64,
}

impl SpendMetric {
    pub fn new(current: f64, reference: f64, absolute_change: f64, percent_change: f64) -> Self {
        Self {
            current,
            reference,
            absolute_change,
            percent_change,
        }
    }

    /// Read a single sub-field.
    pub fn get(&self, field: SubField) -> f64 {
        match field {
            SubField::Current => self.current,
            SubField::Reference => self.reference,
            SubField::AbsoluteChange => self.absolute_change,
            SubField::PercentChange => self.percent_change,
        }
    }

    /// Add every sub-field of `other` into this running total.
    ///
    /// `percent_change` is summed like the rest, so a group's percentage is
    /// the sum of its members' percentages rather than a recomputed ratio.
    pub fn accumulate(&mut self, other: &SpendMetric) {
        self.current += other.current;
        self.reference += other.reference;
        self.absolute_change += other.absolute_change;
        self.percent_change += other.percent_change;
    }
}

/// Numbers, numeric strings, and nothing else. Null, missing, and
/// non-numeric values read as 0.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if number.is_finite() { number } else { 0.0 })
}

// ---------------------------------------------------------------------------
// SubField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubField {
    Current,
    Reference,
    AbsoluteChange,
    PercentChange,
}

impl SubField {
    /// Column order used by the metrics table.
    pub const TABLE_ORDER: [SubField; 4] = [
        SubField::Current,
        SubField::AbsoluteChange,
        SubField::PercentChange,
        SubField::Reference,
    ];

    pub fn field(&self) -> &'static str {
        match self {
            SubField::Current => "current",
            SubField::Reference => "reference",
            SubField::AbsoluteChange => "absoluteChange",
            SubField::PercentChange => "percentChange",
        }
    }

    /// Suffix appended to the metric label in a table header.
    pub fn header_suffix(&self) -> &'static str {
        match self {
            SubField::Current => "Spend",
            SubField::Reference => "Reference",
            SubField::AbsoluteChange => "Abs Change",
            SubField::PercentChange => "% Change",
        }
    }
}

impl FromStr for SubField {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(SubField::Current),
            "reference" => Ok(SubField::Reference),
            "absoluteChange" => Ok(SubField::AbsoluteChange),
            "percentChange" => Ok(SubField::PercentChange),
            other => Err(AnalyticsError::InvalidArgument(format!(
                "unknown metric sub-field '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SubField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

// ---------------------------------------------------------------------------
// MetricKey — The tracked metrics
// ---------------------------------------------------------------------------

/// A tracked spend metric, tying the user-facing label to the record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    MySpend,
    SameStoreSpend,
    NewStoreSpend,
    LostStoreSpend,
}

impl MetricKey {
    pub const ALL: [MetricKey; 4] = [
        MetricKey::MySpend,
        MetricKey::SameStoreSpend,
        MetricKey::NewStoreSpend,
        MetricKey::LostStoreSpend,
    ];

    /// Label shown in the metric selector, table headers and chart legend.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::MySpend => "My Spend",
            MetricKey::SameStoreSpend => "Same Store Spend",
            MetricKey::NewStoreSpend => "New Store Spend",
            MetricKey::LostStoreSpend => "Lost Store Spend",
        }
    }

    /// Field name on a record.
    pub fn field(&self) -> &'static str {
        match self {
            MetricKey::MySpend => "mySpend",
            MetricKey::SameStoreSpend => "sameStoreSpend",
            MetricKey::NewStoreSpend => "newStoreSpend",
            MetricKey::LostStoreSpend => "lostStoreSpend",
        }
    }

    /// Match a label or field name, ignoring spaces and case.
    ///
    /// `"My Spend"`, `"myspend"` and `"mySpend"` all resolve to
    /// [`MetricKey::MySpend`].
    pub fn resolve(name: &str) -> Option<MetricKey> {
        let wanted = normalize(name);
        if wanted.is_empty() {
            return None;
        }
        MetricKey::ALL
            .into_iter()
            .find(|key| normalize(key.label()) == wanted || normalize(key.field()) == wanted)
    }

    /// Resolve a selection of names once, dropping (and logging) the ones
    /// that match no metric. Duplicates keep their first position.
    pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Vec<MetricKey> {
        let mut keys = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match MetricKey::resolve(name) {
                Some(key) if !keys.contains(&key) => keys.push(key),
                Some(_) => {}
                None => log::warn!("metric \"{}\" matches no record field; skipping", name),
            }
        }
        keys
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for MetricKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::resolve(s)
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("unknown metric '{}'", s)))
    }
}

impl AsRef<str> for MetricKey {
    fn as_ref(&self) -> &str {
        self.label()
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
