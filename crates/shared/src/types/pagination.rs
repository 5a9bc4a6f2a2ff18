//! Page parameters and page metadata for the ledger listing.

use serde::{Deserialize, Serialize};

/// Which page of a listing to fetch.
///
/// Serialized as `page` and `limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size, sent as `limit`.
    #[serde(default = "default_per_page", rename = "limit")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
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
    /// Creates a request for `page` with `per_page` items, clamping both to at least 1.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    #[serde(alias = "limit")]
    pub per_page: u32,
    /// Item count over every page.
    pub total: u64,
    /// Page count; an empty listing still has 1 page.
    pub total_pages: u32,
}

impl PageMeta {
    /// Builds metadata for `total` items split into pages of `per_page`.
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

impl<T> PageResponse<T> {
    /// Wraps `data` as page `page` of a listing with `total` items.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(page, per_page, total),
        }
    }

    /// Wraps an unpaginated list as a single page.
    #[must_use]
    pub fn single_page(data: Vec<T>) -> Self {
        let len = data.len();
        let per_page = u32::try_from(len).unwrap_or(u32::MAX);
        Self::new(data, 1, per_page, len as u64)
    }

    /// Returns true if there are more pages after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }
}
