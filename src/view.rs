use serde::{Deserialize, Serialize};

use crate::chart::ChartModel;
use crate::config::NO_DATA_MESSAGE;
use crate::table::TableModel;

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    /// Grouped table.
    #[default]
    Metrics,
    /// Bar chart.
    Analytics,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Metrics => "Metrics View",
            Tab::Analytics => "Analytics View",
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// What the dashboard body should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Presentation {
    NoData,
    Table(TableModel),
    Chart(ChartModel),
}

impl Presentation {
    /// Placeholder text, only for [`Presentation::NoData`].
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Presentation::NoData => Some(NO_DATA_MESSAGE),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Presentation::NoData)
    }
}
