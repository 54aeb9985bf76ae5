//! Page requests and paginated results.

use serde::{Deserialize, Serialize};

/// Default page size for the storefront grid.
pub const DEFAULT_PAGE_SIZE: i64 = 12;
/// Largest page a client may ask for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Requested page (1-indexed).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Clamp into the accepted ranges.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(1))
    }

    /// Inclusive zero-based row range, as the provider's range header wants it.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset().max(0) as u64;
        (from, from.saturating_add(self.limit.max(1) as u64 - 1))
    }
}

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
    /// Total number of pages.
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total <= 0 {
            1
        } else {
            (total - 1) / per_page + 1
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// First item number on this page (1-indexed), 0 when empty.
    pub fn start_item(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.page.max(1) - 1)
                .saturating_mul(self.per_page)
                .saturating_add(1)
        }
    }

    /// Last item number on this page.
    pub fn end_item(&self) -> i64 {
        self.page.saturating_mul(self.per_page).min(self.total)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Slice an in-memory list.
    pub fn from_slice(all: &[T], request: PageRequest) -> Self
    where
        T: Clone,
    {
        let request = request.normalized();
        let start = usize::try_from(request.offset())
            .unwrap_or(usize::MAX)
            .min(all.len());
        let end = start.saturating_add(request.limit as usize).min(all.len());
        Self {
            items: all[start..end].to_vec(),
            pagination: Pagination::new(request.page, request.limit, all.len() as i64),
        }
    }
}
