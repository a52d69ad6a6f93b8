//! Serializable view state and paging arithmetic

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Search, paging, selection and visibility state of one table
///
/// Each screen owns its own instance; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "Id: Serialize",
    deserialize = "Id: Deserialize<'de> + Ord"
))]
pub struct TableViewState<Id> {
    /// Current search term
    pub search_term: String,
    /// 1-based page index
    pub current_page: usize,
    /// Rows per page, at least 1
    pub page_size: usize,
    /// Selected row ids
    pub selected_row_ids: BTreeSet<Id>,
    /// Keys of visible columns
    pub visible_column_keys: BTreeSet<String>,
}

impl<Id: Ord> TableViewState<Id> {
    /// Fresh state on page 1 with the given page size
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            selected_row_ids: BTreeSet::new(),
            visible_column_keys: BTreeSet::new(),
        }
    }
}

impl<Id: Ord> Default for TableViewState<Id> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// `max(1, ceil(filtered / page_size))`; a zero page size counts as 1
#[inline]
#[must_use]
pub fn total_pages(filtered: usize, page_size: usize) -> usize {
    filtered.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `[1, total]`
#[inline]
#[must_use]
pub fn clamp_page(requested: usize, total: usize) -> usize {
    requested.clamp(1, total.max(1))
}
