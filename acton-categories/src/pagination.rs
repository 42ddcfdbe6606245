//! Pagination for the record list
//!
//! Page numbers are 1-indexed and come straight from the query string, so
//! they are clamped rather than rejected: a value that is not a number shows
//! the first page, and anything out of range shows the last.

use serde::Deserialize;

/// Query parameters of the list view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Requested page number, kept raw so malformed values can fall back
    pub p: Option<String>,
}

/// Splits `total` records into pages of `page_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: u64,
    page_size: u64,
}

impl Paginator {
    /// Create a paginator; a zero page size is treated as one
    #[must_use]
    pub fn new(total: u64, page_size: u64) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages, at least one even when there are no records
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// Resolve a raw page parameter into a page
    #[must_use]
    pub fn page(&self, raw: Option<&str>) -> Page {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 => num_pages,
            Some(Ok(n)) => u64::try_from(n).map_or(num_pages, |n| n.min(num_pages)),
        };

        Page {
            number,
            num_pages,
            total: self.total,
            page_size: self.page_size,
        }
    }
}

/// One resolved page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number
    pub number: u64,
    /// Total number of pages
    pub num_pages: u64,
    /// Total number of records
    pub total: u64,
    /// Records per page
    pub page_size: u64,
}

impl Page {
    /// Records skipped before this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.page_size
    }

    /// Maximum records on this page
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }

    /// Whether a previous page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Previous page number, or this one on the first page
    #[must_use]
    pub const fn previous_page_number(&self) -> u64 {
        if self.has_previous() {
            self.number - 1
        } else {
            self.number
        }
    }

    /// Next page number, or this one on the last page
    #[must_use]
    pub const fn next_page_number(&self) -> u64 {
        if self.has_next() {
            self.number + 1
        } else {
            self.number
        }
    }

    /// 1-indexed position of the first record shown, 0 when empty
    #[must_use]
    pub const fn start_index(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-indexed position of the last record shown
    #[must_use]
    pub fn end_index(&self) -> u64 {
        (self.offset() + self.page_size).min(self.total)
    }
}
