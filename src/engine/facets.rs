//! Facet option derivation: which years, months and categories are selectable given
//! the upstream facet values.

use crate::model::{Record, RecordType};
use std::collections::BTreeSet;
use std::iter::once;

/// The sentinel facet value meaning "no restriction". It is always the first entry of
/// every option set, so it is always a valid selection.
pub const ALL: &str = "all";

/// Distinct years across all records, newest first. The year list is not scoped to
/// the selected record type, so it stays stable while the type toggles.
pub(super) fn available_years(records: &[Record]) -> Vec<String> {
    let years: BTreeSet<String> = records.iter().map(Record::year).collect();
    with_all_sentinel(years.into_iter().rev())
}

/// Distinct two-digit months among records matching `record_type` and `year`,
/// newest first.
pub(super) fn available_months(
    records: &[Record],
    record_type: RecordType,
    year: &str,
) -> Vec<String> {
    let months: BTreeSet<String> = records
        .iter()
        .filter(|r| r.record_type() == record_type)
        .filter(|r| year == ALL || r.year() == year)
        .map(Record::month)
        .collect();
    with_all_sentinel(months.into_iter().rev())
}

/// Distinct non-empty category labels among records matching all three upstream
/// facets, in lexicographic order. Records with an empty label never contribute an
/// option.
pub(super) fn available_categories(
    records: &[Record],
    record_type: RecordType,
    year: &str,
    month: &str,
) -> Vec<String> {
    let categories: BTreeSet<String> = records
        .iter()
        .filter(|r| r.record_type() == record_type)
        .filter(|r| year == ALL || r.year() == year)
        .filter(|r| month == ALL || r.month() == month)
        .filter(|r| !r.category().is_empty())
        .map(|r| r.category().to_string())
        .collect();
    with_all_sentinel(categories.into_iter())
}

fn with_all_sentinel(options: impl Iterator<Item = String>) -> Vec<String> {
    once(ALL.to_string()).chain(options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::record;
    use crate::RecordType::{Pass, Primary};

    #[test]
    fn years_are_distinct_and_newest_first() {
        let records = vec![
            record(1, Primary, "2023-01-05 10:00:00", "Login", 5),
            record(2, Primary, "2024-05-01 08:30:00", "Mail", 60),
            record(3, Pass, "2024-06-01 12:00:00", "Event", 1),
        ];
        assert_eq!(available_years(&records), ["all", "2024", "2023"]);
    }

    #[test]
    fn months_are_scoped_to_type_and_year() {
        let records = vec![
            record(1, Primary, "2023-11-05 10:00:00", "Login", 5),
            record(2, Primary, "2024-05-01 08:30:00", "Mail", 60),
            record(3, Primary, "2024-06-01 12:00:00", "Event", 90),
            record(4, Pass, "2024-07-01 12:00:00", "Pack", 1),
        ];
        assert_eq!(
            available_months(&records, Primary, "2024"),
            ["all", "06", "05"]
        );
        assert_eq!(
            available_months(&records, Primary, ALL),
            ["all", "11", "06", "05"]
        );
        assert_eq!(available_months(&records, Pass, "2024"), ["all", "07"]);
        assert_eq!(available_months(&records, Pass, "2023"), ["all"]);
    }

    #[test]
    fn categories_are_sorted_ascending_and_skip_empty_labels() {
        let records = vec![
            record(1, Primary, "2024-05-01 08:30:00", "Mail", 60),
            record(2, Primary, "2024-05-02 08:30:00", "Event", 90),
            record(3, Primary, "2024-05-03 08:30:00", "", 10),
            record(4, Primary, "2024-05-04 08:30:00", "Mail", 30),
        ];
        assert_eq!(
            available_categories(&records, Primary, "2024", "05"),
            ["all", "Event", "Mail"]
        );
        assert_eq!(
            available_categories(&records, Primary, "2024", "06"),
            ["all"]
        );
    }
}
