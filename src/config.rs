/// Separator used when a group key is rendered as a single string.
pub const GROUP_KEY_DELIMITER: &str = " | ";

/// Message shown in place of the table or chart when there is nothing to show.
pub const NO_DATA_MESSAGE: &str = "No data found.";

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// How far back the date picker reaches, and the default range width.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 12;

/// Chart index when no grouping attribute is selected.
pub const DEFAULT_CHART_INDEX: &str = "sector";

pub const SECTORS: [&str; 2] = ["Retail", "Hospitality"];

pub const CATEGORIES: [&str; 4] = ["Juice", "Snacks", "Beverages", "Frozen Foods"];
