//! Page slicing over a resolved search state
//!
//! Collections and items are paged as if they formed one list with all
//! collections first:
//!
//! ```text
//! start       = page * size
//! collections = collection_ids[start .. start + size]            (clipped)
//! remaining   = size - collections.len()
//! item_start  = max(0, page * size - collection_count)
//! items       = item_ids[item_start .. item_start + remaining]   (if remaining > 0)
//! ```
//!
//! Slicing is pure index arithmetic over ids already held by the state.

use super::error::SearchError;
use super::state::SearchState;
use crate::model::ResourceId;

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: usize,
    size: usize,
}

impl PageRequest {
    /// # Errors
    ///
    /// Returns `SearchError::InvalidPage` if `size` is zero.
    pub fn new(index: usize, size: usize) -> Result<Self, SearchError> {
        if size == 0 {
            return Err(SearchError::InvalidPage(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { index, size })
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn size(self) -> usize {
        self.size
    }
}

/// Ids to materialize for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice<'s> {
    pub collections: &'s [ResourceId],
    pub items: &'s [ResourceId],
}

impl PageSlice<'_> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.collections.len() + self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the collection and item ids belonging to `page`
#[must_use]
pub fn slice(state: &SearchState, page: PageRequest) -> PageSlice<'_> {
    let start = page.index.saturating_mul(page.size);
    let collections = window(state.collection_ids(), start, page.size);

    let remaining = page.size - collections.len();
    let items = if remaining > 0 {
        let item_start = start.saturating_sub(state.collection_count());
        window(state.item_ids(), item_start, remaining)
    } else {
        &[]
    };

    PageSlice { collections, items }
}

/// Number of pages needed to show `total` results, `size` per page
#[must_use]
pub const fn page_count(total: usize, size: usize) -> usize {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

fn window(ids: &[ResourceId], start: usize, len: usize) -> &[ResourceId] {
    if start >= ids.len() {
        return &[];
    }
    let end = start.saturating_add(len).min(ids.len());
    &ids[start..end]
}
