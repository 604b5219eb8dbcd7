//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Builds a request, clamping page to at least 1 and per-page into `1..=100`.
    #[must_use]
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or_else(default_page).max(1),
            per_page: per_page
                .unwrap_or_else(default_per_page)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    /// Zero-based page index as expected by `SeaORM` paginators.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.index() * self.per_page
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Sort direction accepted on list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses `asc`/`desc` case-insensitively; anything else yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Pagination metadata returned beside list data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number.
    pub current_page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Last page number (at least 1).
    pub last_page: u64,
    /// 1-based position of the first item on this page.
    pub from: Option<u64>,
    /// 1-based position of the last item on this page.
    pub to: Option<u64>,
    /// Whether a later page exists.
    pub has_more_pages: bool,
}

impl Pagination {
    /// Computes metadata for a page holding `item_count` rows of `total`.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, item_count: u64) -> Self {
        let per_page = request.per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if item_count == 0 {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + item_count - 1))
        };

        Self {
            current_page: request.page,
            per_page,
            total,
            last_page,
            from,
            to,
            has_more_pages: request.page < last_page,
        }
    }
}

/// A page of items together with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let pagination = Pagination::new(request, total, data.len() as u64);
        Self { data, pagination }
    }

    /// Maps every item, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
