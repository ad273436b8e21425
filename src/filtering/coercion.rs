use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use super::criteria::FilterValue;
use crate::schema::{AttributeKind, Temporal};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Best-effort conversion of a raw query value for an equality comparison.
///
/// Never fails: anything that cannot be interpreted stays the raw string.
#[must_use]
pub fn coerce(raw: &str, kind: AttributeKind) -> FilterValue {
    match kind {
        // Numeric-looking text matches literally, e.g. a zip code "01234"
        AttributeKind::Text if looks_numeric(raw) => return FilterValue::text(raw),
        AttributeKind::DateTime(temporal) => {
            return parse_timestamp(raw).map_or(FilterValue::InvalidDate, |ts| match temporal {
                Temporal::Zoned => FilterValue::Timestamp(ts),
                Temporal::Naive => FilterValue::DateTime(ts.naive_utc()),
                Temporal::Date => FilterValue::Date(ts.date_naive()),
            });
        }
        // Integer columns deliberately take the generic path below
        AttributeKind::Text | AttributeKind::Integer | AttributeKind::Other => {}
    }

    serde_json::from_str::<JsonValue>(raw).map_or_else(|_| FilterValue::text(raw), FilterValue::Json)
}

/// Whether `raw` reads as a number the way a lenient numeric cast would:
/// blank strings, decimals, exponents and `0x`/`0o`/`0b` integers count.
fn looks_numeric(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|digits| (digits, *radix)));
    if let Some((digits, radix)) = radix {
        return !digits.is_empty() && u64::from_str_radix(digits, radix).is_ok();
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if matches!(unsigned, "Infinity") {
        return true;
    }
    // Rust accepts "inf" and "NaN" spellings that do not count as numbers here
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    trimmed.parse::<f64>().is_ok_and(|n| !n.is_nan())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
