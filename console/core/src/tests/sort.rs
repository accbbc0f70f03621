use super::*;
use crate::{sort, ByCreation, ByName, Order, Reverse};
use pretty_assertions::assert_eq;
use std::cmp::Ordering;

fn unsorted() -> Vec<ItemCell> {
    vec![
        ItemCell(mk_item("c", Some(3))),
        ItemCell(mk_item("a", Some(1))),
        ItemCell(mk_item("tie-first", Some(2))),
        ItemCell(mk_item("untimed", None)),
        ItemCell(mk_item("tie-second", Some(2))),
        ItemCell(mk_item("b", Some(0))),
    ]
}

#[test]
fn creation_order_is_ascending_and_stable() {
    let mut cells = unsorted();
    sort::sort(&mut cells, &ByCreation);
    assert_eq!(
        names(&cells),
        vec!["untimed", "b", "a", "tie-first", "tie-second", "c"]
    );

    for pair in cells.windows(2) {
        assert!(pair[0].created_at() <= pair[1].created_at());
    }
}

#[test]
fn sorting_is_idempotent() {
    let mut once = unsorted();
    sort::sort(&mut once, &ByCreation);

    let mut twice = once.clone();
    sort::sort(&mut twice, &ByCreation);
    assert_eq!(once, twice);
}

#[test]
fn ties_keep_input_order() {
    let mut cells = vec![
        ItemCell(mk_item("z", Some(5))),
        ItemCell(mk_item("y", Some(5))),
        ItemCell(mk_item("x", Some(5))),
    ];
    sort::sort(&mut cells, &ByCreation);
    assert_eq!(names(&cells), vec!["z", "y", "x"]);
}

#[test]
fn orders_by_name() {
    let mut cells = unsorted();
    sort::sort(&mut cells, &ByName);
    assert_eq!(
        names(&cells),
        vec!["a", "b", "c", "tie-first", "tie-second", "untimed"]
    );
}

#[test]
fn reverse_keeps_ties_stable() {
    let mut cells = unsorted();
    sort::sort(&mut cells, &Reverse(ByCreation));
    assert_eq!(
        names(&cells),
        vec!["c", "tie-first", "tie-second", "a", "b", "untimed"]
    );
}

#[test]
fn closures_are_orders() {
    let by_len = |a: &ItemCell, b: &ItemCell| a.name().len().cmp(&b.name().len());
    assert_eq!(
        by_len.compare(&ItemCell(mk_item("aa", None)), &ItemCell(mk_item("b", None))),
        Ordering::Greater
    );

    let mut cells = unsorted();
    sort::sort(&mut cells, &by_len);
    assert_eq!(
        names(&cells),
        vec!["c", "a", "b", "untimed", "tie-first", "tie-second"]
    );
}

#[test]
fn named_orders() {
    use crate::SortBy;

    for (s, expected) in [
        ("", SortBy::Created),
        ("created", SortBy::Created),
        ("name", SortBy::Name),
        ("-created", SortBy::CreatedDesc),
        ("-name", SortBy::NameDesc),
    ] {
        assert_eq!(s.parse::<SortBy>(), Ok(expected), "{s:?}");
    }
    assert!("Name".parse::<SortBy>().is_err());

    let mut cells = unsorted();
    sort::sort(&mut cells, &SortBy::NameDesc);
    assert_eq!(
        names(&cells),
        vec!["untimed", "tie-second", "tie-first", "c", "b", "a"]
    );

    let mut by_name = unsorted();
    sort::sort(&mut by_name, &SortBy::Name);
    let mut expected = unsorted();
    sort::sort(&mut expected, &ByName);
    assert_eq!(by_name, expected);
}
