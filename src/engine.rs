//! Pure filter and sort pipeline over in-memory income statements.
//!
//! Nothing here mutates its input or fails: every function borrows a slice
//! and returns a freshly ordered `Vec`. The same functions back both the
//! client-side wiring and the proxy backend.

use std::cmp::Ordering;

use crate::models::{FilterSpec, FinancialRecord, SortKey, SortOrder, SortSpec};

/// Keep the records that satisfy every set bound of `filter`.
///
/// An unconstrained spec returns the input unchanged.
pub fn apply_filters(records: &[FinancialRecord], filter: &FilterSpec) -> Vec<FinancialRecord> {
    let bounds = filter.bounds();
    records
        .iter()
        .filter(|r| bounds.iter().all(|b| b.admits(r)))
        .cloned()
        .collect()
}

/// Order `records` by the active key and direction.
///
/// The sort is stable, so equal keys keep their input order in both
/// directions. Unparseable dates and NaN amounts always go last.
pub fn apply_sort(records: &[FinancialRecord], sort: &SortSpec) -> Vec<FinancialRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(a, b, sort));
    sorted
}

/// `apply_sort(apply_filters(records, filter), sort)`.
pub fn visible(
    records: &[FinancialRecord],
    filter: &FilterSpec,
    sort: &SortSpec,
) -> Vec<FinancialRecord> {
    apply_sort(&apply_filters(records, filter), sort)
}

/// Comparator used by [`apply_sort`].
pub fn compare(a: &FinancialRecord, b: &FinancialRecord, sort: &SortSpec) -> Ordering {
    match sort.key {
        SortKey::Date => directed(a.instant(), b.instant(), sort.order),
        SortKey::Revenue => directed(amount(a.revenue), amount(b.revenue), sort.order),
        SortKey::NetIncome => directed(amount(a.net_income), amount(b.net_income), sort.order),
    }
}

fn directed<T: PartialOrd>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let asc = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => asc,
                SortOrder::Descending => asc.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn amount(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

