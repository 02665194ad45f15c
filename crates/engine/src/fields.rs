//! Candidate-field lookup and scalar coercion for loosely shaped records.
//!
//! Every canonical field is described by an ordered list of source paths. A
//! path is either a flat key (`"unit_id"`) or a dotted path into a nested
//! object (`"unit.id"`). The first path holding a non-null value wins; if that
//! value cannot be coerced the field is absent, later paths are not consulted.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Ordered source paths for one canonical field.
pub type Candidates = &'static [&'static str];

/// Resolves one dotted path. `null` counts as absent.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// First non-null value among the candidates.
pub fn first<'a>(raw: &'a Value, candidates: Candidates) -> Option<&'a Value> {
    candidates.iter().find_map(|path| lookup(raw, path))
}

pub fn id(raw: &Value, candidates: Candidates) -> Option<i64> {
    first(raw, candidates).and_then(as_integer)
}

pub fn text(raw: &Value, candidates: Candidates) -> Option<String> {
    first(raw, candidates).and_then(as_text)
}

/// Like [`text`], but an empty string counts as absent.
pub fn non_empty_text(raw: &Value, candidates: Candidates) -> Option<String> {
    text(raw, candidates).filter(|value| !value.is_empty())
}

pub fn flag(raw: &Value, candidates: Candidates) -> Option<bool> {
    first(raw, candidates).and_then(|value| match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Coerces numbers and numeric strings to an integer.
///
/// Non-finite or fractional values are absent, as is an empty string.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) => parse_integer(text),
        _ => None,
    }
}

/// Text form of a scalar, trimmed. Objects and arrays have none.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Parses operator or server text as an integer the way a numeric field
/// would: surrounding whitespace is ignored, `"12.0"` is 12, `"12.5"` is not.
pub fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().and_then(integral)
}

fn integral(value: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first float past it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value.fract() != 0.0 || value >= LIMIT || value < -LIMIT {
        return None;
    }
    Some(value as i64)
}

/// Parses a calendar date the operator may type or the server may send.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    parse_timestamp(trimmed).map(|timestamp| timestamp.date())
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// `YYYY-MM-DD` form of a date, or the input unchanged when it is not one.
pub fn display_date(text: &str) -> String {
    match parse_date(text) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text.to_string(),
    }
}

/// `YYYY-MM-DD HH:MM` form of a timestamp, or the input unchanged.
pub fn display_timestamp(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(timestamp) = parse_timestamp(trimmed) {
        return timestamp.format("%Y-%m-%d %H:%M").to_string();
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_skips_missing_and_null_paths() {
        let raw = json!({ "unit_id": null, "unit": { "id": 7 } });
        let value = first(&raw, &["unit_id", "unit.id"]);
        assert_eq!(value, Some(&json!(7)));
    }

    #[test]
    fn first_defined_value_wins_even_when_uncoercible() {
        let raw = json!({ "id": "abc", "unit_id": 4 });
        assert_eq!(id(&raw, &["id", "unit_id"]), None);
    }

    #[test]
    fn integers_accept_numeric_strings_and_integral_floats() {
        assert_eq!(as_integer(&json!(12)), Some(12));
        assert_eq!(as_integer(&json!(12.0)), Some(12));
        assert_eq!(as_integer(&json!(" 12 ")), Some(12));
        assert_eq!(as_integer(&json!("12.0")), Some(12));
        assert_eq!(as_integer(&json!(12.5)), None);
        assert_eq!(as_integer(&json!("")), None);
        assert_eq!(as_integer(&json!("NaN")), None);
        assert_eq!(as_integer(&json!("inf")), None);
        assert_eq!(as_integer(&json!(true)), None);
    }

    #[test]
    fn text_is_trimmed_and_scalars_are_stringified() {
        assert_eq!(as_text(&json!("  beef ")), Some("beef".to_string()));
        assert_eq!(as_text(&json!(10)), Some("10".to_string()));
        assert_eq!(as_text(&json!({ "a": 1 })), None);
    }

    #[test]
    fn dates_are_normalized_or_passed_through() {
        assert_eq!(display_date("2025-10-30"), "2025-10-30");
        assert_eq!(display_date("2025-10-30T00:00:00.000Z"), "2025-10-30");
        assert_eq!(display_date("2025-10-30T09:15:00+09:00"), "2025-10-30");
        assert_eq!(display_date("not-a-date"), "not-a-date");
        assert_eq!(display_date("2025-02-30"), "2025-02-30");
    }

    #[test]
    fn timestamps_display_to_the_minute() {
        assert_eq!(
            display_timestamp("2025-09-01T08:30:59.000Z"),
            "2025-09-01 08:30"
        );
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }
}
