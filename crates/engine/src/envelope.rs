//! Extraction of record sequences from response envelopes.

use serde_json::Value;

/// Keys that may carry the record sequence, in priority order.
const ENVELOPE_KEYS: [&str; 3] = ["items", "data", "results"];

/// Returns the records carried by a response body.
///
/// A bare array is returned as is. An object is searched for an array under
/// `items`, `data`, then `results`; a key whose value is not an array is
/// skipped. Anything else yields no records.
pub fn records(body: &Value) -> &[Value] {
    if let Value::Array(records) = body {
        return records;
    }

    ENVELOPE_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_is_returned() {
        let body = json!([{ "unit_id": 1 }, { "unit_id": 2 }]);
        assert_eq!(records(&body).len(), 2);
    }

    #[test]
    fn keys_are_tried_in_priority_order() {
        let body = json!({
            "results": [{ "id": 3 }],
            "data": [{ "id": 2 }],
            "items": [{ "id": 1 }],
        });
        assert_eq!(records(&body), &[json!({ "id": 1 })]);
    }

    #[test]
    fn non_array_key_falls_through_to_next() {
        let body = json!({ "items": { "id": 1 }, "data": [{ "id": 2 }] });
        assert_eq!(records(&body), &[json!({ "id": 2 })]);
    }

    #[test]
    fn unrecognized_shapes_yield_nothing() {
        for body in [
            Value::Null,
            json!(42),
            json!("items"),
            json!({ "rows": [1, 2] }),
            json!({ "data": null }),
            json!(true),
        ] {
            assert!(records(&body).is_empty(), "{body}");
        }
    }
}
