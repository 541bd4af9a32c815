//! Deserialization helpers for fields that sources deliver loosely typed.
//!
//! Numbers may arrive as JSON strings (`"10.00"`, `"1,350"`); they are
//! always re-emitted as JSON numbers. `image_urls` may arrive as a
//! JSON-encoded string (legacy exchange format). Timestamps may lack an
//! offset, in which case they are read as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrEncoded {
    List(Vec<String>),
    Encoded(String),
}

fn strip_grouping(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
        .collect()
}

/// Parse a numeric string, tolerating `$` and grouping commas.
pub(crate) fn parse_number_str(s: &str) -> Option<f64> {
    strip_grouping(s)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse an integral string, tolerating grouping commas and a `.0` suffix.
pub(crate) fn parse_integer_str(s: &str) -> Option<i64> {
    let cleaned = strip_grouping(s);
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(v);
    }
    let f = cleaned.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// RFC 3339, or naive ISO-8601 (`2023-04-08T05:58:49.494561`) read as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn now() -> Option<DateTime<Utc>> {
    Some(Utc::now())
}

pub(crate) fn number<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrStr::deserialize(d)? {
        NumOrStr::Int(v) => Ok(v as f64),
        NumOrStr::Float(v) => Ok(v),
        NumOrStr::Str(s) => parse_number_str(&s)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got '{s}'"))),
    }
}

fn integer_from<E: de::Error>(raw: NumOrStr) -> Result<i64, E> {
    match raw {
        NumOrStr::Int(v) => Ok(v),
        NumOrStr::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        NumOrStr::Float(v) => Err(E::custom(format!("expected an integer, got {v}"))),
        NumOrStr::Str(s) => parse_integer_str(&s)
            .ok_or_else(|| E::custom(format!("expected an integer, got '{s}'"))),
    }
}

pub(crate) fn count<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    integer_from(NumOrStr::deserialize(d)?)
}

pub(crate) fn opt_count<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => integer_from(raw).map(Some),
    }
}

pub(crate) fn string_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ListOrEncoded>::deserialize(d)? {
        None => Ok(Vec::new()),
        Some(ListOrEncoded::List(v)) => Ok(v),
        Some(ListOrEncoded::Encoded(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(ListOrEncoded::Encoded(s)) => serde_json::from_str::<Vec<String>>(&s)
            .map_err(|e| de::Error::custom(format!("image_urls: not a JSON string array: {e}"))),
    }
}

pub(crate) fn opt_timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("not a valid datetime: '{s}'"))),
    }
}
