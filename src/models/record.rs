use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::metric::{MetricKey, SpendMetric};
use super::row::SpendRow;
use crate::error::{AnalyticsError, Result};

// ---------------------------------------------------------------------------
// Dimension — Categorical attributes usable as a group key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Country,
    State,
    City,
    Sector,
    Category,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Country,
        Dimension::State,
        Dimension::City,
        Dimension::Sector,
        Dimension::Category,
    ];

    /// Label shown in the group-by selector and as a table header.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Country => "Country",
            Dimension::State => "State",
            Dimension::City => "City",
            Dimension::Sector => "Sector",
            Dimension::Category => "Category",
        }
    }

    /// Field name on a record and on an aggregated row.
    pub fn field(&self) -> &'static str {
        match self {
            Dimension::Country => "country",
            Dimension::State => "state",
            Dimension::City => "city",
            Dimension::Sector => "sector",
            Dimension::Category => "category",
        }
    }

    /// Parse a list of attribute names, failing on the first unknown one.
    /// Duplicates keep their first position.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Dimension>> {
        let mut dims = Vec::with_capacity(names.len());
        for name in names {
            let dim: Dimension = name.as_ref().parse()?;
            if !dims.contains(&dim) {
                dims.push(dim);
            }
        }
        Ok(dims)
    }
}

impl FromStr for Dimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|dim| dim.field().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("unknown grouping attribute '{}'", s)))
    }
}

impl AsRef<str> for Dimension {
    fn as_ref(&self) -> &str {
        self.field()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// An inclusive `[start, end]` span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidArgument(format!(
                "date range starts after it ends ({} > {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// True when `[start, end]` shares at least one day with this range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Parse a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or a
/// naive `YYYY-MM-DDTHH:MM:SS` timestamp. Only the date part is kept.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    Err(AnalyticsError::InvalidDate(s.to_string()))
}

/// A date that is absent, null, or unparseable reads as `None`.
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let date = match &value {
        serde_json::Value::Null => None,
        serde_json::Value::String(raw) => match parse_date(raw) {
            Ok(date) => Some(date),
            Err(err) => {
                log::warn!("{}; record kept without this date", err);
                None
            }
        },
        other => {
            log::warn!("date is not a string: {}; record kept without this date", other);
            None
        }
    };
    Ok(date)
}

/// A metric that is absent, null, or not an object reads as `None`.
fn lenient_metric<'de, D>(deserializer: D) -> std::result::Result<Option<SpendMetric>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// Record — One per-store spend observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_metric", skip_serializing_if = "Option::is_none")]
    pub my_spend: Option<SpendMetric>,
    #[serde(default, deserialize_with = "lenient_metric", skip_serializing_if = "Option::is_none")]
    pub same_store_spend: Option<SpendMetric>,
    #[serde(default, deserialize_with = "lenient_metric", skip_serializing_if = "Option::is_none")]
    pub new_store_spend: Option<SpendMetric>,
    #[serde(default, deserialize_with = "lenient_metric", skip_serializing_if = "Option::is_none")]
    pub lost_store_spend: Option<SpendMetric>,
}

impl Record {
    /// The record's own `[start_date, end_date]` span, or `None` when
    /// either date is missing.
    ///
    /// Source data is not validated, so `start` may come after `end`.
    pub fn period(&self) -> Option<DateRange> {
        Some(DateRange {
            start: self.start_date?,
            end: self.end_date?,
        })
    }
}

impl SpendRow for Record {
    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        Some(match dimension {
            Dimension::Country => &self.country,
            Dimension::State => &self.state,
            Dimension::City => &self.city,
            Dimension::Sector => &self.sector,
            Dimension::Category => &self.category,
        })
    }

    fn metric(&self, key: MetricKey) -> Option<&SpendMetric> {
        match key {
            MetricKey::MySpend => self.my_spend.as_ref(),
            MetricKey::SameStoreSpend => self.same_store_spend.as_ref(),
            MetricKey::NewStoreSpend => self.new_store_spend.as_ref(),
            MetricKey::LostStoreSpend => self.lost_store_spend.as_ref(),
        }
    }
}
