//! Filtering and sorting.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{FilterSpec, Record, SortDirection};

/// Filter `records` by `filter`, then sort by visit date.
///
/// The sort is stable, so records sharing a date keep their cache order.
/// Records without a parsable date sort last in either direction.
pub fn apply(records: &[Record], filter: &FilterSpec, sort: SortDirection) -> Vec<Record> {
    let mut matched: Vec<Record> = records
        .iter()
        .filter(|record| matches(record, filter))
        .cloned()
        .collect();
    sort_by_date(&mut matched, sort);

    tracing::debug!(
        input = records.len(),
        matched = matched.len(),
        descending = sort.is_descending(),
        "Applied record query"
    );
    matched
}

/// True if `record` satisfies every active predicate of `filter`.
pub fn matches(record: &Record, filter: &FilterSpec) -> bool {
    matches_search(record, &filter.search)
        && matches_hospital(record, filter.hospital.as_deref())
        && matches_date_range(record, filter.date_start, filter.date_end)
}

/// Case-insensitive substring match against name or registration number.
pub fn matches_search(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    record.name.to_lowercase().contains(&term) || record.reg_no.to_lowercase().contains(&term)
}

/// Exact facility match; no selection matches everything.
pub fn matches_hospital(record: &Record, hospital: Option<&str>) -> bool {
    match hospital {
        Some(selected) => record.hospital == selected,
        None => true,
    }
}

/// Inclusive calendar-date range check.
///
/// An undated record cannot be placed in a range, so it only passes when
/// both bounds are absent.
pub fn matches_date_range(
    record: &Record,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = record.visit_date() else {
        return false;
    };
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

/// Stable in-place sort by visit date, undated records last.
pub fn sort_by_date(records: &mut [Record], sort: SortDirection) {
    records.sort_by(|a, b| compare_dates(a.visit_date(), b.visit_date(), sort));
}

fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, sort: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match sort {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
