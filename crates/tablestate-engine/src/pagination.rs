//! Pagination engine.

use std::ops::Range;

use tablestate_core::DEFAULT_PAGE_SIZE;

/// 1-based page index and positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationEngine {
    page: usize,
    page_size: usize,
}

impl Default for PaginationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationEngine {
    /// Start on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` items; at least 1.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Move to `page`, clamped to the available pages. Returns true if the
    /// page index changed.
    pub fn set_page(&mut self, page: usize, total: usize) -> bool {
        let page = page.clamp(1, self.page_count(total));
        let changed = self.page != page;
        self.page = page;
        changed
    }

    /// Change the page size and return to page 1. Zero is rejected.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            return false;
        }
        let changed = self.page_size != page_size || self.page != 1;
        self.page_size = page_size;
        self.page = 1;
        changed
    }

    /// Back to page 1. Returns true if the page index changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.page != 1;
        self.page = 1;
        changed
    }

    /// Pull the page index back into range after `total` shrank.
    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total);
        if self.page > last {
            self.page = last;
            true
        } else {
            false
        }
    }

    /// Index range of the current page within `total` items.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// Check if the current page is the first.
    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }

    /// Check if the current page is the last for `total` items.
    pub fn is_last_page(&self, total: usize) -> bool {
        self.page >= self.page_count(total)
    }
}

/// The slice of `items` on the current page.
pub fn paginate<'a, T>(items: &'a [T], pagination: &PaginationEngine) -> &'a [T] {
    &items[pagination.range(items.len())]
}
