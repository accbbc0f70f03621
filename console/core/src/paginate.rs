use serde::{Deserialize, Serialize};

/// Selects one page of an ordered sequence.
///
/// `page_index` is 1-based; values below 1 select the first page. A
/// `page_size` of zero or less disables pagination.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginateQuery {
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub page_index: i64,
}

// === impl PaginateQuery ===

impl PaginateQuery {
    pub fn new(page_size: i64, page_index: i64) -> Self {
        Self {
            page_size,
            page_index,
        }
    }

    /// Returns every item.
    pub fn disabled() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.page_size <= 0
    }

    /// The `start..end` range of the page within `len` items, or `None` when
    /// pagination is disabled. Pages past the end yield an empty range.
    pub fn range(&self, len: usize) -> Option<std::ops::Range<usize>> {
        if self.is_disabled() {
            return None;
        }

        let size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let index = usize::try_from(self.page_index.max(1)).unwrap_or(usize::MAX);
        let start = (index - 1).saturating_mul(size);
        if start >= len {
            return Some(len..len);
        }

        Some(start..start.saturating_add(size).min(len))
    }

    pub(crate) fn apply<C>(&self, mut cells: Vec<C>) -> Vec<C> {
        let Some(range) = self.range(cells.len()) else {
            return cells;
        };

        cells.truncate(range.end);
        cells.drain(..range.start);
        cells
    }
}
