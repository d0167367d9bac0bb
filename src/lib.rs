//! Spend analytics dashboard core.
//!
//! Filters per-store spend records by sector, category and date range,
//! groups them by any combination of attributes, sums the selected metrics,
//! and produces sortable, paginated table pages or bar-chart data. Drawing
//! is left to the host UI; this crate owns the state and the view models.
//!
//! # Quick start
//!
//! ```no_run
//! use spend_analytics::{Dashboard, Presentation};
//!
//! let mut dashboard = Dashboard::builder().build().unwrap();
//! dashboard.set_group_by(&["Sector", "Category"]).unwrap();
//! dashboard.set_sector(Some("Retail"));
//!
//! if let Presentation::Table(table) = dashboard.present() {
//!     for row in &table.rows {
//!         println!("{}", row.join(" | "));
//!     }
//! }
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod filter;
pub mod mock;
pub mod models;
pub mod pagination;
pub mod sort;
pub mod source;
pub mod table;
pub mod view;

pub use aggregate::{Aggregation, Aggregator};
pub use chart::{ChartDatum, ChartModel};
pub use error::{AnalyticsError, Result};
pub use filter::RecordFilter;
pub use mock::MockGenerator;
pub use models::*;
pub use pagination::Pagination;
pub use sort::{SortKey, SortOrder, SortState};
pub use source::RecordSource;
pub use table::{Column, TableModel};
pub use view::{Presentation, Tab};

use chrono::{Local, Months, NaiveDate};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// DashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Dashboard`].
///
/// Use [`Dashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DashboardBuilder::build).
pub struct DashboardBuilder {
    source: Option<RecordSource>,
    today: Option<NaiveDate>,
    lookback_months: u32,
    page_size: usize,
    seed: u64,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self {
            source: None,
            today: None,
            lookback_months: config::DEFAULT_LOOKBACK_MONTHS,
            page_size: config::DEFAULT_PAGE_SIZE,
            seed: mock::DEFAULT_SEED,
        }
    }
}

impl DashboardBuilder {
    /// Use the given records instead of generated mock data.
    pub fn source(mut self, source: RecordSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Pin "today" instead of reading the local clock.
    ///
    /// Sets the end of the default date range and the latest date the range
    /// may reach.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// How many months back the date range may reach. Defaults to 12.
    pub fn lookback_months(mut self, months: u32) -> Self {
        self.lookback_months = months;
        self
    }

    /// Initial table page size. Defaults to 5.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Seed for the mock data used when no source is given.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the dashboard with every metric and attribute selected, the
    /// first user active, and the full lookback window as the date range.
    pub fn build(self) -> Result<Dashboard> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let earliest = today
            .checked_sub_months(Months::new(self.lookback_months))
            .ok_or_else(|| {
                AnalyticsError::InvalidDate(format!(
                    "{} minus {} months is out of range",
                    today, self.lookback_months
                ))
            })?;
        let pagination = Pagination::new(self.page_size)?;
        let source = match self.source {
            Some(source) => source,
            None => MockGenerator::new(self.seed)
                .months(self.lookback_months + 1)
                .source(today),
        };
        let selected_user = source
            .users()
            .first()
            .map(|u| u.id.clone())
            .unwrap_or_default();

        Ok(Dashboard {
            source,
            today,
            earliest,
            tab: Tab::default(),
            user_dialog_open: false,
            selected_user,
            date_range: DateRange {
                start: earliest,
                end: today,
            },
            sector: None,
            category: None,
            metrics: MetricKey::ALL.to_vec(),
            group_by: Dimension::ALL.to_vec(),
            sort: SortState::default(),
            pagination,
            memo: RefCell::new(None),
            recomputations: Cell::new(0),
        })
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Inputs the aggregated rows depend on. Anything else (tab, dialog, sort,
/// page) reuses the cached rows.
#[derive(Debug, Clone, PartialEq)]
struct AggregationInputs {
    user_id: String,
    date_range: DateRange,
    sector: Option<String>,
    category: Option<String>,
    group_by: Vec<Dimension>,
    metrics: Vec<MetricKey>,
}

struct Memo {
    inputs: AggregationInputs,
    rows: Rc<[AggregatedRow]>,
}

/// Selection state of the spend dashboard plus its derived views.
///
/// Created via [`Dashboard::builder()`].
pub struct Dashboard {
    source: RecordSource,
    today: NaiveDate,
    earliest: NaiveDate,
    tab: Tab,
    user_dialog_open: bool,
    selected_user: String,
    date_range: DateRange,
    sector: Option<String>,
    category: Option<String>,
    metrics: Vec<MetricKey>,
    group_by: Vec<Dimension>,
    sort: SortState,
    pagination: Pagination,
    memo: RefCell<Option<Memo>>,
    recomputations: Cell<usize>,
}

impl Dashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    // -- Tabs and the member dialog ----------------------------------------

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn is_user_dialog_open(&self) -> bool {
        self.user_dialog_open
    }

    pub fn open_user_dialog(&mut self) {
        self.user_dialog_open = true;
    }

    pub fn close_user_dialog(&mut self) {
        self.user_dialog_open = false;
    }

    /// Members listed in the selection dialog.
    pub fn users(&self) -> &[User] {
        self.source.users()
    }

    /// Switch to another member's records and close the dialog.
    pub fn select_user(&mut self, id: &str) -> Result<()> {
        if self.source.user(id).is_none() {
            return Err(AnalyticsError::NotFound(format!("user '{}'", id)));
        }
        self.selected_user = id.to_string();
        self.user_dialog_open = false;
        Ok(())
    }

    pub fn active_user(&self) -> Option<&User> {
        self.source.user(&self.selected_user)
    }

    /// Swap in a different record source.
    ///
    /// The active member is kept if they exist in the new source, otherwise
    /// the first member becomes active.
    pub fn replace_source(&mut self, source: RecordSource) {
        if source.user(&self.selected_user).is_none() {
            self.selected_user = source
                .users()
                .first()
                .map(|u| u.id.clone())
                .unwrap_or_default();
        }
        self.source = source;
        self.memo.get_mut().take();
    }

    // -- Filters ------------------------------------------------------------

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Earliest and latest dates the range may cover.
    pub fn date_bounds(&self) -> DateRange {
        DateRange {
            start: self.earliest,
            end: self.today,
        }
    }

    /// Set the date range. Future dates and dates before the lookback
    /// window are rejected, as is `start > end`.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let range = DateRange::new(start, end)?;
        let bounds = self.date_bounds();
        if !bounds.contains(range.start) || !bounds.contains(range.end) {
            return Err(AnalyticsError::InvalidDate(format!(
                "{} is outside the selectable window {}",
                range, bounds
            )));
        }
        self.date_range = range;
        Ok(())
    }

    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref()
    }

    /// Filter to one sector; `None` or `""` shows every sector.
    pub fn set_sector(&mut self, sector: Option<&str>) {
        self.sector = sector.filter(|s| !s.is_empty()).map(str::to_string);
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Filter to one category; `None` or `""` shows every category.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.filter(|c| !c.is_empty()).map(str::to_string);
    }

    /// The filter matching the current sector, category and date range.
    pub fn record_filter(&self) -> RecordFilter {
        let mut filter = RecordFilter::new();
        filter
            .sector(self.sector.as_deref().unwrap_or(""))
            .category(self.category.as_deref().unwrap_or(""))
            .date_range(self.date_range);
        filter
    }

    // -- Grouping and metrics -----------------------------------------------

    pub fn metrics(&self) -> &[MetricKey] {
        &self.metrics
    }

    /// Select metrics by label or field name. Names matching no metric are
    /// logged and skipped.
    pub fn set_metrics<S: AsRef<str>>(&mut self, names: &[S]) {
        self.metrics = MetricKey::resolve_all(names);
    }

    pub fn group_by(&self) -> &[Dimension] {
        &self.group_by
    }

    /// Select grouping attributes by name, in display order.
    ///
    /// An unknown name leaves the selection untouched. Clearing the
    /// grouping also clears the selected metrics.
    pub fn set_group_by<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.group_by = Dimension::parse_all(names)?;
        if self.group_by.is_empty() {
            self.metrics.clear();
        }
        Ok(())
    }

    // -- Sorting and paging ---------------------------------------------------

    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Handle a column header click; see [`SortState::request`].
    pub fn request_sort(&mut self, key: SortKey) {
        self.sort.request(key);
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page);
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.pagination.set_page_size(page_size)
    }

    // -- Derived data -------------------------------------------------------

    /// The active member's records after filtering.
    pub fn filtered_records(&self) -> Cow<'_, [Record]> {
        self.record_filter()
            .apply(self.source.records_for(&self.selected_user))
    }

    fn aggregation_inputs(&self) -> AggregationInputs {
        AggregationInputs {
            user_id: self.selected_user.clone(),
            date_range: self.date_range,
            sector: self.sector.clone(),
            category: self.category.clone(),
            group_by: self.group_by.clone(),
            metrics: self.metrics.clone(),
        }
    }

    /// Aggregated rows for the current selection, in first-seen group order.
    ///
    /// Empty when no grouping attribute is selected. Recomputed only when
    /// the member, filters, grouping or metric selection change.
    pub fn grouped_rows(&self) -> Rc<[AggregatedRow]> {
        let inputs = self.aggregation_inputs();
        if let Some(memo) = self.memo.borrow().as_ref() {
            if memo.inputs == inputs {
                return Rc::clone(&memo.rows);
            }
        }

        let filtered = self.filtered_records();
        let records: &[Record] = &filtered;
        let aggregator = Aggregator::new(&self.group_by, &self.metrics);
        let rows: Rc<[AggregatedRow]> = aggregator
            .aggregate(records)
            .into_grouped()
            .unwrap_or_default()
            .into();

        self.recomputations.set(self.recomputations.get() + 1);
        log::debug!(
            "recomputed {} grouped rows for user {}",
            rows.len(),
            inputs.user_id
        );
        *self.memo.borrow_mut() = Some(Memo {
            inputs,
            rows: Rc::clone(&rows),
        });
        rows
    }

    /// How many times the grouped rows have been recomputed.
    pub fn recompute_count(&self) -> usize {
        self.recomputations.get()
    }

    /// What the dashboard body should show for the active tab.
    pub fn present(&self) -> Presentation {
        let rows = self.grouped_rows();
        match self.tab {
            Tab::Metrics => {
                if self.group_by.is_empty() || rows.is_empty() {
                    return Presentation::NoData;
                }
                Presentation::Table(TableModel::build(
                    &rows,
                    &self.group_by,
                    &self.metrics,
                    &self.sort,
                    &self.pagination,
                ))
            }
            Tab::Analytics => {
                if self.metrics.is_empty() || rows.is_empty() {
                    return Presentation::NoData;
                }
                Presentation::Chart(ChartModel::project(&rows, &self.group_by, &self.metrics))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group_by: Vec<&str> = self.group_by.iter().map(|d| d.field()).collect();
        let metrics: Vec<&str> = self.metrics.iter().map(|m| m.field()).collect();
        write!(
            f,
            "Dashboard(user={}, tab={}, range={}, group_by=[{}], metrics=[{}])",
            self.selected_user,
            self.tab.label(),
            self.date_range,
            group_by.join(", "),
            metrics.join(", ")
        )
    }
}
