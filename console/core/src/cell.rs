use chrono::{DateTime, Utc};
use thiserror::Error;

/// A read-only view over a single native resource value.
///
/// Cells only expose the metadata the selection stages need, so the same
/// pipeline runs over every resource kind.
pub trait Cell {
    fn name(&self) -> &str;

    /// The object's creation time. Objects without one order before all
    /// others.
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

/// Converts a snapshot of one resource kind into cells and back.
///
/// `from_cells(to_cells(items))` must yield `items` unchanged and in order.
pub trait Adapter {
    type Resource;
    type Cell: Cell;

    fn to_cell(&self, resource: Self::Resource) -> Self::Cell;

    fn from_cell(&self, cell: Self::Cell) -> Result<Self::Resource, ConversionError>;

    fn to_cells<I>(&self, resources: I) -> Vec<Self::Cell>
    where
        I: IntoIterator<Item = Self::Resource>,
    {
        resources.into_iter().map(|r| self.to_cell(r)).collect()
    }

    fn from_cells<I>(&self, cells: I) -> Result<Vec<Self::Resource>, ConversionError>
    where
        I: IntoIterator<Item = Self::Cell>,
    {
        cells.into_iter().map(|c| self.from_cell(c)).collect()
    }
}

/// Raised when an adapter is handed a cell of a kind it does not handle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot convert {found} cell {name:?} into {expected}")]
pub struct ConversionError {
    pub expected: String,
    pub found: String,
    pub name: String,
}

impl<C: Cell + ?Sized> Cell for &C {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}

impl<C: Cell + ?Sized> Cell for Box<C> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}
