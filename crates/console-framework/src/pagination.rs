//! # Pagination
//!
//! [`PaginationInfo`] mirrors the `pagination` object returned by list
//! endpoints. The backend is trusted for counts, but the navigation flags are
//! always re-derived so `has_next == current_page < total_pages` and
//! `has_prev == current_page > 1` hold after every fetch.

use serde::{Deserialize, Serialize};

/// Fixed page size used by every screen.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

fn first_page() -> u32 {
    1
}

impl Default for PaginationInfo {
    fn default() -> Self {
        Self::single_page(0)
    }
}

impl PaginationInfo {
    /// Builds pagination for `total_count` items viewed at `current_page`.
    pub fn for_total(current_page: u32, total_count: u64, page_size: u32) -> Self {
        let page_size = u64::from(page_size.max(1));
        let total_pages = total_count.div_ceil(page_size).max(1);
        Self {
            current_page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_count,
            has_next: false,
            has_prev: false,
        }
        .normalized()
    }

    /// Synthetic pagination for a scoped fetch that returns everything at once.
    pub fn single_page(total_count: u64) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count,
            has_next: false,
            has_prev: false,
        }
    }

    /// Clamps pages to at least one and recomputes the navigation flags.
    pub fn normalized(mut self) -> Self {
        self.total_pages = self.total_pages.max(1);
        self.current_page = self.current_page.max(1);
        self.has_next = self.current_page < self.total_pages;
        self.has_prev = self.current_page > 1;
        self
    }

    /// Whether `page` is a legal navigation target from this state.
    pub fn accepts(&self, page: u32) -> bool {
        if page == 0 || page > self.total_pages {
            return false;
        }
        if page == self.current_page + 1 && !self.has_next {
            return false;
        }
        if page + 1 == self.current_page && !self.has_prev {
            return false;
        }
        true
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.current_page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev.then(|| self.current_page - 1)
    }
}
