use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wall-clock format used for record timestamps, on disk and over the API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single successful check-in. Never mutated once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub name: String,
    /// Self-reported student number (MIS).
    pub identifier: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// Network origin of the submission, used as the duplicate-guard key.
    pub origin: String,
}

impl AttendanceRecord {
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        timestamp: NaiveDateTime,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            timestamp,
            origin: origin.into(),
        }
    }

    /// Calendar day the record belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Parses a stored timestamp. Accepts the canonical format and ISO-8601 (`T` separator).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| raw.parse::<NaiveDateTime>())
        .ok()
}

mod timestamp_format {
    use super::{TIMESTAMP_FORMAT, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
