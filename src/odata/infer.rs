//! Value-based type inference for attributes without metadata.
//!
//! Precedence is fixed, first match wins:
//!
//! ```text
//! "true"/"false"  -> boolean
//! GUID            -> lookup
//! finite decimal  -> number
//! calendar date   -> date
//! anything else   -> string
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::metadata::{AttributeMap, AttributeType};

static GUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static DECIMAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Effective type of `attr`: its metadata type when known, otherwise
/// inferred from the raw value.
pub fn effective_type(attr: &str, value: &str, attr_map: Option<&AttributeMap>) -> AttributeType {
    attr_map
        .and_then(|map| map.get(attr))
        .map(|meta| meta.attr_type)
        .unwrap_or_else(|| infer_type(value))
}

/// Guess an attribute type from a raw filter value.
pub fn infer_type(value: &str) -> AttributeType {
    let trimmed = value.trim();

    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        AttributeType::Boolean
    } else if is_guid(value) {
        AttributeType::Lookup
    } else if parse_finite_decimal(trimmed).is_some() {
        AttributeType::Number
    } else if parse_date(trimmed).is_some() {
        AttributeType::Date
    } else {
        AttributeType::String
    }
}

/// Hyphenated 8-4-4-4-12 hex GUID.
pub fn is_guid(value: &str) -> bool {
    GUID_PATTERN.is_match(value)
}

fn parse_finite_decimal(value: &str) -> Option<f64> {
    if !DECIMAL_PATTERN.is_match(value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric coercion with JavaScript `Number()` semantics.
///
/// Blank input is `0`, `±Infinity` is accepted, anything non-numeric is NaN.
pub fn js_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if DECIMAL_PATTERN.is_match(trimmed) {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Parse a calendar date or date-time. Values without an offset are UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
