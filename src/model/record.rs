use crate::Result;
use anyhow::bail;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The timestamp layout used by ledger export files, e.g. `2024-05-01 08:30:00`.
pub(crate) const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp in the export layout.
pub(crate) fn parse_export_time(s: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, EXPORT_TIME_FORMAT)?)
}

/// Represents a single ledger entry for one account.
///
/// The serde field names follow the upstream export format: `type` is a numeric code,
/// `action_name` is the label of the action that produced the entry, `time` is a
/// `YYYY-MM-DD HH:MM:SS` datetime, and `num` is the signed amount. Some exports write
/// `uid` as a JSON string instead of a number; both are accepted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier used only as an ordering tie-break. JSON exports omit it, in
    /// which case the store assigns positional ids.
    #[serde(default)]
    id: i64,
    /// The account this entry belongs to.
    #[serde(deserialize_with = "uid_from_string_or_number")]
    uid: u64,
    #[serde(rename = "type")]
    record_type: RecordType,
    /// The label of the action that produced the entry. May be empty.
    #[serde(rename = "action_name")]
    category: String,
    #[serde(with = "export_time")]
    time: NaiveDateTime,
    #[serde(rename = "num")]
    amount: i64,
}

impl Record {
    pub fn new(
        id: i64,
        uid: u64,
        record_type: RecordType,
        category: impl Into<String>,
        time: NaiveDateTime,
        amount: i64,
    ) -> Self {
        Self {
            id,
            uid,
            record_type,
            category: category.into(),
            time,
            amount,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// The entry's year as a facet value, e.g. `"2024"`.
    pub fn year(&self) -> String {
        self.time.format("%Y").to_string()
    }

    /// The entry's month as a two-digit facet value, e.g. `"05"`.
    pub fn month(&self) -> String {
        self.time.format("%m").to_string()
    }
}

/// Represents the kind of resource a ledger entry moves. The export encodes it as a
/// numeric code: 1 for the primary currency, 2 for the pass currency.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecordType {
    #[default]
    Primary,
    Pass,
}

impl From<RecordType> for u8 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Primary => 1,
            RecordType::Pass => 2,
        }
    }
}

impl TryFrom<u8> for RecordType {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(RecordType::Primary),
            2 => Ok(RecordType::Pass),
            bad => bail!("Invalid record type code '{bad}'"),
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Primary => write!(f, "primary"),
            RecordType::Pass => write!(f, "pass"),
        }
    }
}

/// Serde adapter for the export's `YYYY-MM-DD HH:MM:SS` timestamps.
mod export_time {
    use super::EXPORT_TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(EXPORT_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, EXPORT_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Accepts a uid written either as a JSON number or as a quoted string.
fn uid_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct UidVisitor;

    impl serde::de::Visitor<'_> for UidVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
            formatter.write_str("an account uid as a number or string")
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(value).map_err(E::custom)
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value.parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(UidVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_with_numeric_uid() {
        let json = r#"{
            "uid": 600012345,
            "month": "202405",
            "type": 1,
            "action": "mail_reward",
            "action_name": "Mail",
            "time": "2024-05-01 08:30:00",
            "num": 60
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), 0);
        assert_eq!(record.uid(), 600012345);
        assert_eq!(record.record_type(), RecordType::Primary);
        assert_eq!(record.category(), "Mail");
        assert_eq!(record.year(), "2024");
        assert_eq!(record.month(), "05");
        assert_eq!(record.amount(), 60);
    }

    #[test]
    fn parse_record_with_string_uid() {
        let json = r#"{"uid":"600012345","type":2,"action_name":"","time":"2023-12-31 23:59:59","num":-1}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.uid(), 600012345);
        assert_eq!(record.record_type(), RecordType::Pass);
        assert_eq!(record.category(), "");
        assert_eq!(record.amount(), -1);
    }

    #[test]
    fn time_round_trips_through_the_export_layout() {
        let time = parse_export_time("2024-06-01 12:00:00").unwrap();
        let record = Record::new(1, 1, RecordType::Primary, "Event", time, 90);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""time":"2024-06-01 12:00:00""#));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn unknown_type_code_is_rejected() {
        let json = r#"{"uid":1,"type":3,"action_name":"x","time":"2024-05-01 00:00:00","num":1}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}
