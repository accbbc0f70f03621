#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Resource selection for the console.
//!
//! A snapshot of cluster objects is wrapped into [`Cell`]s by an
//! [`Adapter`], run through a [`Selector`] (filter, sort, paginate) and
//! converted back into native objects.

pub mod cell;
mod filter;
mod paginate;
pub mod select;
pub mod sort;


pub use self::{
    cell::{Adapter, Cell, ConversionError},
    filter::FilterQuery,
    paginate::PaginateQuery,
    select::{SelectQuery, Selection, Selector},
    sort::{ByCreation, ByName, InvalidSortBy, Order, Reverse, SortBy},
};
pub use chrono::{DateTime, Utc};
