//! Field decoders for the value shapes ClassCharts sends on the wire
//!
//! These are used through `#[serde(deserialize_with = "...")]` on record fields, so
//! every decoding failure surfaces as a `serde_json::Error` naming the field.

use crate::sanitize::sanitize;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// ISO-8601 layouts with a UTC offset; the offset is dropped, wall-clock time is kept
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// ISO-8601 layouts without an offset
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp, a bare date meaning midnight
pub(crate) fn parse_iso_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("invalid ISO-8601 timestamp `{value}`"))
}

/// Parse the date part of an ISO-8601 date or timestamp
pub(crate) fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso_datetime(value).map(|parsed| parsed.date())
}

pub(crate) fn iso_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_iso_datetime(&raw).map_err(D::Error::custom)
}

pub(crate) fn iso_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse_iso_date(&raw).map_err(D::Error::custom)
}

pub(crate) fn iso_dates<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<NaiveDate>, D::Error> {
    let raw = Option::<Vec<String>>::deserialize(d)?.unwrap_or_default();
    raw.iter()
        .map(|value| parse_iso_date(value).map_err(D::Error::custom))
        .collect()
}

/// Strict `%Y-%m-%d`
pub(crate) fn ymd_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| D::Error::custom(format!("invalid date `{raw}`: {e}")))
}

/// Strict `%H:%M`
pub(crate) fn hm_time<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(d)?;
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| D::Error::custom(format!("invalid time `{raw}`: {e}")))
}

/// HTML text run through the sanitizer; `null` becomes an empty string
pub(crate) fn sanitized<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().map(sanitize).unwrap_or_default())
}

/// `"yes"` flags
pub(crate) fn yes_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref() == Some("yes"))
}

/// Announcement `state`
pub(crate) fn viewed_state<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref() == Some("viewed"))
}

/// Optional text where an empty string means absent
pub(crate) fn empty_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

/// `{"name": ...}` objects that may themselves be `null`
pub(crate) fn nested_name<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Named {
        #[serde(default)]
        name: Option<String>,
    }

    let raw = Option::<Named>::deserialize(d)?;
    Ok(raw.and_then(|named| named.name))
}

/// Text the service sends either as a string or as a number
pub(crate) fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Interpret a number or numeric string; `None` for null and blank strings
fn number_from_value(value: &Value) -> Result<Option<u32>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                // Fractional values are truncated
                number
                    .as_f64()
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(|n| n.trunc() as u64)
            })
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("expected a non-negative integer, got {number}")),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| format!("expected a non-negative integer, got `{text}`")),
        other => Err(format!("expected a non-negative integer, got {other}")),
    }
}

/// Integer sent as a number or string; null and blank default to zero
pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    number_from_value(&value)
        .map(Option::unwrap_or_default)
        .map_err(D::Error::custom)
}

/// Integer sent as a number or string that must be present
pub(crate) fn required_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    number_from_value(&value)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("expected a non-negative integer, got nothing"))
}

/// A count, or a list whose length is the count
pub(crate) fn count_or_len<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    if let Value::Array(items) = &value {
        return u32::try_from(items.len()).map_err(D::Error::custom);
    }
    number_from_value(&value)
        .map(Option::unwrap_or_default)
        .map_err(D::Error::custom)
}

/// JSON object, where an empty array or null stands for an empty object
pub(crate) fn object_or_empty_array<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(d)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(D::Error::custom(format!("expected an object, got {other}"))),
    }
}
