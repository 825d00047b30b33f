//! Offset pagination for search results.

use serde::{Deserialize, Serialize};

/// Requested page of a search, 1-based.
///
/// A `page_size` of 0 means "not given"; [`Paging::normalize`] replaces it
/// with the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paging {
    /// Page number, starting at 1.
    pub page_number: u32,

    /// Maximum number of items on the page, 0 for the configured default.
    pub page_size: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 0,
        }
    }
}

impl Paging {
    /// Creates paging for the given page and size.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Clamps the page number to at least 1, substitutes `default_page_size`
    /// for a missing size and clamps the size to `1..=max_page_size`.
    pub fn normalize(self, default_page_size: u32, max_page_size: u32) -> Self {
        let page_size = if self.page_size == 0 {
            default_page_size
        } else {
            self.page_size
        };
        Self {
            page_number: self.page_number.max(1),
            page_size: page_size.clamp(1, max_page_size.max(1)),
        }
    }

    /// Returns the number of items to skip, `(pageNumber - 1) * pageSize`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of search results.
///
/// `items.len() <= page_size` always holds; `total_count` counts the whole
/// matching set, not just this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Documents on this page.
    pub items: Vec<T>,

    /// Number of documents matching the criteria.
    pub total_count: u64,

    /// Page number that was served.
    pub page_number: u32,

    /// Page size that was served.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Creates an empty page for the given paging.
    pub fn empty(paging: Paging) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_number: paging.page_number,
            page_size: paging.page_size,
        }
    }

    /// Returns true if there is at least one more page after this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) * u64::from(self.page_size) < self.total_count
    }

    /// Returns the number of pages in the full result set.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }
}
