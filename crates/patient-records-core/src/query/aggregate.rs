//! Summary statistics over a filtered record sequence.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Visit counts keyed by `YYYY-MM` month string.
pub type MonthlyCounts = BTreeMap<String, usize>;

/// Visit counts keyed by facility name.
pub type HospitalCounts = BTreeMap<String, usize>;

/// Aggregates for the filtered (pre-pagination) records.
///
/// `monthly_count` only covers records with a parsable date and
/// `hospital_count` only records with a facility, so:
///
/// ```text
/// sum(monthly_count) + undated_count == total_count
///     == sum(hospital_count) + unassigned_hospital_count
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    /// Number of records in the sequence
    pub total_count: usize,
    /// Records per visit month (months absent from the input are omitted)
    pub monthly_count: MonthlyCounts,
    /// Records per facility (facilities absent from the input are omitted)
    pub hospital_count: HospitalCounts,
    /// Records excluded from `monthly_count` for lack of a date
    pub undated_count: usize,
    /// Records excluded from `hospital_count` for lack of a facility
    pub unassigned_hospital_count: usize,
}

impl Summary {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compute the summary for `records`.
pub fn summarize(records: &[Record]) -> Summary {
    let mut summary = Summary {
        total_count: records.len(),
        ..Summary::default()
    };

    for record in records {
        match record.month_key() {
            Some(month) => *summary.monthly_count.entry(month).or_insert(0) += 1,
            None => summary.undated_count += 1,
        }
        match record.hospital_name() {
            Some(hospital) => {
                *summary
                    .hospital_count
                    .entry(hospital.to_string())
                    .or_insert(0) += 1
            }
            None => summary.unassigned_hospital_count += 1,
        }
    }

    summary
}

/// Distinct facilities across `records`, in first-occurrence order.
///
/// Feed this the whole cache, not the filtered view, or the selector
/// options shrink as filters are applied.
pub fn hospital_options(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(Record::hospital_name)
        .filter(|hospital| seen.insert(*hospital))
        .map(str::to_string)
        .collect()
}
