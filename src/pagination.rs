//! Page windows over a sorted row sequence.

use std::ops::Range;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{AnalyticsError, Result};

/// Zero-based page index plus page size.
///
/// The page index is never clamped against the data: a page past the end
/// yields an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Start at page 0 with the given size. A size of 0 is rejected.
    pub fn new(page_size: usize) -> Result<Self> {
        check_page_size(page_size)?;
        Ok(Self { page: 0, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        check_page_size(page_size)?;
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Index window `[page*size, page*size + size)` clipped to `total`.
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.window(items.len())]
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }
}

fn check_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(AnalyticsError::InvalidArgument(
            "page size must be at least 1".to_string(),
        ));
    }
    Ok(())
}
