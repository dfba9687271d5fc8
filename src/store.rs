//! The ledger store: reads a record export file into memory.
//!
//! The engine never performs I/O; this module is the external data source that
//! produces the full record collection for one account. JSON exports are either a
//! bare array of records or the API-shaped object carrying a `list` field. CSV
//! exports use the same field names as column headers.

use crate::model::{parse_export_time, Record, RecordType};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// The object shape of an API detail response; only the record list matters.
#[derive(Debug, Deserialize)]
struct ExportEnvelope {
    list: Vec<Record>,
}

/// One row of a CSV export. Timestamps and type codes arrive as plain text and are
/// validated during conversion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: i64,
    uid: u64,
    #[serde(rename = "type")]
    record_type: u8,
    action_name: String,
    time: String,
    num: i64,
}

impl TryFrom<CsvRow> for Record {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let record_type = RecordType::try_from(row.record_type)?;
        let time = parse_export_time(&row.time)
            .with_context(|| format!("Invalid timestamp '{}'", row.time))?;
        Ok(Record::new(
            row.id,
            row.uid,
            record_type,
            row.action_name,
            time,
            row.num,
        ))
    }
}

/// Reads all records for one account from the export file at `path`.
///
/// Records belonging to a different account are dropped with a warning; the engine
/// requires a single-account collection. When `uid` is `None`, the account is taken
/// from the first record in the export.
pub(crate) async fn load_records(path: &Path, uid: Option<u64>) -> Result<Vec<Record>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content = utils::read(path).await?;
    let mut records = match extension.as_str() {
        "json" => parse_json(&content)
            .with_context(|| format!("Failed to parse JSON ledger export at {}", path.display()))?,
        "csv" => parse_csv(&content)
            .with_context(|| format!("Failed to parse CSV ledger export at {}", path.display()))?,
        other => bail!(
            "Unsupported ledger export extension '{other}' at {}",
            path.display()
        ),
    };
    assign_missing_ids(&mut records);
    let records = retain_account(records, uid);
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_json(content: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        let envelope: ExportEnvelope = serde_json::from_value(value)?;
        Ok(envelope.list)
    }
}

fn parse_csv(content: &str) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    for (row_ix, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result.with_context(|| format!("Invalid record at row {}", row_ix + 2))?;
        let record =
            Record::try_from(row).with_context(|| format!("Invalid record at row {}", row_ix + 2))?;
        records.push(record);
    }
    Ok(records)
}

/// JSON exports omit record ids. Positional ids keep the engine's ordering
/// tie-break deterministic.
fn assign_missing_ids(records: &mut [Record]) {
    for (index, record) in records.iter_mut().enumerate() {
        if record.id() == 0 {
            record.set_id(index as i64 + 1);
        }
    }
}

/// Keeps only records for one account: the given uid, or the first record's.
fn retain_account(records: Vec<Record>, uid: Option<u64>) -> Vec<Record> {
    let Some(uid) = uid.or_else(|| records.first().map(Record::uid)) else {
        return records;
    };
    let total = records.len();
    let kept: Vec<Record> = records.into_iter().filter(|r| r.uid() == uid).collect();
    let dropped = total - kept.len();
    if dropped > 0 {
        warn!("Dropped {dropped} records belonging to accounts other than {uid}");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{record, TEST_UID};
    use crate::RecordType::{Pass, Primary};

    const JSON_ARRAY: &str = r#"[
        {"uid": 600012345, "type": 1, "action_name": "Mail", "time": "2024-05-01 08:30:00", "num": 60},
        {"uid": "600012345", "type": 2, "action_name": "Pack", "time": "2024-06-01 12:00:00", "num": 1}
    ]"#;

    #[test]
    fn parses_a_bare_json_array() {
        let records = parse_json(JSON_ARRAY).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type(), Primary);
        assert_eq!(records[1].record_type(), Pass);
        assert_eq!(records[1].uid(), TEST_UID);
    }

    #[test]
    fn parses_an_api_envelope() {
        let content = format!(r#"{{"uid": "600012345", "list": {JSON_ARRAY}}}"#);
        let records = parse_json(&content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category(), "Mail");
    }

    #[test]
    fn parses_a_csv_export() {
        let content = "id,uid,type,action_name,time,num\n\
                       7,600012345,1,Mail,2024-05-01 08:30:00,60\n\
                       8,600012345,1,Event,2024-06-01 12:00:00,90\n";
        let records = parse_csv(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), 7);
        assert_eq!(records[1].amount(), 90);
    }

    #[test]
    fn rejects_a_csv_row_with_a_bad_type_code() {
        let content = "id,uid,type,action_name,time,num\n1,600012345,9,Mail,2024-05-01 08:30:00,60\n";
        let error = parse_csv(content).unwrap_err();
        assert!(format!("{error:#}").contains("row 2"));
    }

    #[test]
    fn assigns_positional_ids_to_records_without_one() {
        let mut records = parse_json(JSON_ARRAY).unwrap();
        assign_missing_ids(&mut records);
        assert_eq!(records[0].id(), 1);
        assert_eq!(records[1].id(), 2);
    }

    #[test]
    fn keeps_explicit_ids_when_present() {
        let mut records = vec![
            record(9, Primary, "2024-05-01 08:30:00", "Mail", 60),
            record(0, Primary, "2024-06-01 12:00:00", "Event", 90),
        ];
        assign_missing_ids(&mut records);
        assert_eq!(records[0].id(), 9);
        assert_eq!(records[1].id(), 2);
    }

    #[test]
    fn drops_records_for_other_accounts() {
        let records = vec![
            record(1, Primary, "2024-05-01 08:30:00", "Mail", 60),
            Record::new(
                2,
                999,
                Primary,
                "Event",
                crate::test::time("2024-06-01 12:00:00"),
                90,
            ),
        ];
        let kept = retain_account(records.clone(), Some(TEST_UID));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].uid(), TEST_UID);

        // Without an explicit uid the first record decides the account.
        let kept = retain_account(records, None);
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn loads_a_json_file_and_rejects_unknown_extensions() {
        use tempfile::TempDir;
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("ledger.json");
        std::fs::write(&json_path, JSON_ARRAY).unwrap();
        let records = load_records(&json_path, None).await.unwrap();
        assert_eq!(records.len(), 2);

        let bad_path = dir.path().join("ledger.txt");
        std::fs::write(&bad_path, "whatever").unwrap();
        let error = load_records(&bad_path, None).await.unwrap_err();
        assert!(format!("{error}").contains("Unsupported ledger export extension"));
    }
}
