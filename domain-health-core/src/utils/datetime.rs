//! Datetime helpers.
//!
//! - Serde support: `DateTime<Utc>` <-> RFC3339 string
//! - [`parse_whois_date`]: lenient parsing of the date spellings registries put in WHOIS output

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Date-time layouts seen in WHOIS responses, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%SZ",
    "%Y.%m.%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
];

/// Date-only layouts; these resolve to midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d-%b-%Y", "%d-%B-%Y", "%Y.%m.%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y", "%b %d %Y",
];

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from an RFC3339 string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| serde::de::Error::custom(format!("Invalid RFC3339 timestamp: {e}")))
}

/// Parses an expiration/creation date as printed by a WHOIS server.
///
/// Returns `None` when no known layout matches.
pub fn parse_whois_date(text: &str) -> Option<DateTime<Utc>> {
    let cleaned = text
        .trim()
        .replace(" (UTC)", "")
        .replace(" UTC", "Z")
        .replace(" +0000", "Z");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
