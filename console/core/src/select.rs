use crate::{sort, Adapter, ByCreation, Cell, ConversionError, FilterQuery, Order, PaginateQuery};
use serde::{Deserialize, Serialize};

/// The caller's parameters for a single selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectQuery {
    #[serde(default)]
    pub filter: FilterQuery,
    #[serde(default)]
    pub paginate: PaginateQuery,
}

/// One page of a selection.
///
/// `total` counts every item that survived filtering, regardless of
/// pagination, so callers can compute the number of pages.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Selection<T> {
    pub total: usize,
    pub items: Vec<T>,
}

/// Runs filter, sort and paginate over one snapshot of cells.
///
/// A selector is built for a single request and consumed by
/// [`Selector::select`]. Every stage always runs; an empty filter or a
/// disabled page size just passes the cells through.
#[derive(Debug)]
pub struct Selector<C, O = ByCreation> {
    cells: Vec<C>,
    query: SelectQuery,
    order: O,
}

// === impl SelectQuery ===

impl SelectQuery {
    pub fn new(filter: FilterQuery, paginate: PaginateQuery) -> Self {
        Self { filter, paginate }
    }
}

// === impl Selection ===

impl<T> Selection<T> {
    pub fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Selection<U> {
        Selection {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn try_map_items<U, E>(
        self,
        f: impl FnOnce(Vec<T>) -> Result<Vec<U>, E>,
    ) -> Result<Selection<U>, E> {
        Ok(Selection {
            total: self.total,
            items: f(self.items)?,
        })
    }
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// === impl Selector ===

impl<C: Cell> Selector<C> {
    pub fn new(cells: Vec<C>, query: SelectQuery) -> Self {
        Self {
            cells,
            query,
            order: ByCreation,
        }
    }
}

impl<C: Cell, O: Order<C>> Selector<C, O> {
    /// Replaces the sort order. Filtering and pagination are unaffected.
    pub fn with_order<P: Order<C>>(self, order: P) -> Selector<C, P> {
        Selector {
            cells: self.cells,
            query: self.query,
            order,
        }
    }

    pub fn select(self) -> Selection<C> {
        let Self {
            cells,
            query,
            order,
        } = self;

        let mut cells = query.filter.apply(cells);
        // Counted before pagination: page arithmetic depends on it.
        let total = cells.len();

        sort::sort(&mut cells, &order);
        let items = query.paginate.apply(cells);

        Selection { total, items }
    }
}

/// Selects from a native snapshot, converting through `adapter` on the way
/// in and out.
pub fn select<A, O>(
    adapter: &A,
    resources: impl IntoIterator<Item = A::Resource>,
    query: SelectQuery,
    order: O,
) -> Result<Selection<A::Resource>, ConversionError>
where
    A: Adapter,
    O: Order<A::Cell>,
{
    Selector::new(adapter.to_cells(resources), query)
        .with_order(order)
        .select()
        .try_map_items(|cells| adapter.from_cells(cells))
}
