//! Shared test fixtures.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{parse_export_time, Record, RecordType};
use chrono::NaiveDateTime;

/// The account uid used by fixture records.
pub(crate) const TEST_UID: u64 = 600_012_345;

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp, panicking on malformed input.
pub(crate) fn time(s: &str) -> NaiveDateTime {
    parse_export_time(s).unwrap()
}

/// A record for [`TEST_UID`] with the given facet-relevant fields.
pub(crate) fn record(
    id: i64,
    record_type: RecordType,
    time_str: &str,
    category: &str,
    amount: i64,
) -> Record {
    Record::new(id, TEST_UID, record_type, category, time(time_str), amount)
}

/// The two-record ledger used by the walkthrough tests: a May mail reward worth 60
/// and a June event reward worth 90, both primary currency in 2024.
pub(crate) fn sample_records() -> Vec<Record> {
    vec![
        record(1, RecordType::Primary, "2024-05-01 08:30:00", "Mail", 60),
        record(2, RecordType::Primary, "2024-06-01 12:00:00", "Event", 90),
    ]
}
