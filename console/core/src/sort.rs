//! Orderings for the sort stage.
//!
//! The sort stage is stable: cells that compare equal keep their input order,
//! so sorting an already-sorted sequence leaves it unchanged.

use crate::Cell;
use std::{cmp::Ordering, str::FromStr};
use thiserror::Error;

/// A comparator over cells.
pub trait Order<C: ?Sized> {
    fn compare(&self, a: &C, b: &C) -> Ordering;
}

/// Oldest first. Cells without a creation time come before all others.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ByCreation;

/// Lexicographic by name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ByName;

/// Inverts an ordering. Equal cells still keep their input order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reverse<O>(pub O);

/// A named ordering, as chosen by API callers.
///
/// Parsed from `created`, `name`, `-created` and `-name`; a leading `-`
/// sorts descending.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Created,
    Name,
    CreatedDesc,
    NameDesc,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown sort order: {0:?}")]
pub struct InvalidSortBy(String);

pub(crate) fn sort<C, O>(cells: &mut [C], order: &O)
where
    O: Order<C> + ?Sized,
{
    cells.sort_by(|a, b| order.compare(a, b));
}

// === impl ByCreation ===

impl<C: Cell + ?Sized> Order<C> for ByCreation {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        a.created_at().cmp(&b.created_at())
    }
}

// === impl ByName ===

impl<C: Cell + ?Sized> Order<C> for ByName {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        a.name().cmp(b.name())
    }
}

// === impl Reverse ===

impl<C: ?Sized, O: Order<C>> Order<C> for Reverse<O> {
    #[inline]
    fn compare(&self, a: &C, b: &C) -> Ordering {
        self.0.compare(b, a)
    }
}

// === impl SortBy ===

impl<C: Cell + ?Sized> Order<C> for SortBy {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        match self {
            Self::Created => ByCreation.compare(a, b),
            Self::Name => ByName.compare(a, b),
            Self::CreatedDesc => Reverse(ByCreation).compare(a, b),
            Self::NameDesc => Reverse(ByName).compare(a, b),
        }
    }
}

impl FromStr for SortBy {
    type Err = InvalidSortBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "created" => Ok(Self::Created),
            "name" => Ok(Self::Name),
            "-created" => Ok(Self::CreatedDesc),
            "-name" => Ok(Self::NameDesc),
            _ => Err(InvalidSortBy(s.to_string())),
        }
    }
}

impl<C: ?Sized, F> Order<C> for F
where
    F: Fn(&C, &C) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &C, b: &C) -> Ordering {
        (self)(a, b)
    }
}
