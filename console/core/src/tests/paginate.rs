use super::*;
use crate::PaginateQuery;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(1, 0..10)]
#[case(2, 10..20)]
#[case(3, 20..25)]
#[case(4, 25..25)]
#[case(100, 25..25)]
fn pages_of_ten(#[case] page: i64, #[case] expected: std::ops::Range<usize>) {
    let query = PaginateQuery::new(10, page);
    assert_eq!(query.range(25), Some(expected.clone()));

    let page = query.apply(mk_cells(25));
    let expected = mk_cells(25)[expected].to_vec();
    assert_eq!(page, expected);
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(i64::MIN)]
fn non_positive_index_is_first_page(#[case] index: i64) {
    let query = PaginateQuery::new(10, index);
    assert_eq!(query.range(25), Some(0..10));
}

#[rstest]
#[case(0, 1)]
#[case(-5, 3)]
#[case(0, -2)]
fn non_positive_size_disables_pagination(#[case] size: i64, #[case] index: i64) {
    let query = PaginateQuery::new(size, index);
    assert!(query.is_disabled());
    assert_eq!(query.range(7), None);
    assert_eq!(query.apply(mk_cells(7)), mk_cells(7));
}

#[test]
fn huge_values_do_not_overflow() {
    let query = PaginateQuery::new(i64::MAX, i64::MAX);
    assert_eq!(query.range(3), Some(3..3));
    assert!(query.apply(mk_cells(3)).is_empty());

    let query = PaginateQuery::new(i64::MAX, 1);
    assert_eq!(query.apply(mk_cells(3)), mk_cells(3));
}

#[test]
fn empty_input_yields_empty_page() {
    let query = PaginateQuery::new(10, 1);
    assert_eq!(query.range(0), Some(0..0));
    assert!(query.apply(Vec::<ItemCell>::new()).is_empty());
}
