use crate::Cell;
use serde::{Deserialize, Serialize};

/// Selects cells by name.
///
/// A cell matches when its name contains `name` as a sub-string. Matching is
/// case-sensitive and compares the raw UTF-8 text; an empty name matches
/// every cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub name: String,
}

// === impl FilterQuery ===

impl FilterQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn matches<C: Cell + ?Sized>(&self, cell: &C) -> bool {
        cell.name().contains(self.name.as_str())
    }

    /// Drops the cells that do not match, keeping the survivors in order.
    pub(crate) fn apply<C: Cell>(&self, cells: Vec<C>) -> Vec<C> {
        if self.is_empty() {
            return cells;
        }

        cells.into_iter().filter(|c| self.matches(c)).collect()
    }
}
