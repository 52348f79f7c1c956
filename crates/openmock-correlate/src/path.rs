use openmock_core::Record;
use serde_json::Value;

/// Resolve a dotted path (`data.consentId`) through nested objects.
pub fn lookup_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// `null`, `false`, zero, and empty strings, arrays or objects.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(value) => !value,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(value) => value.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            left == right || matches!((left.as_f64(), right.as_f64()), (Some(l), Some(r)) if l == r)
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left.iter().zip(right).all(|(left, right)| values_equal(left, right))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, value)| right.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => left == right,
    }
}

/// Compare a stored value with a textual query value. Strings compare
/// exactly; numbers and booleans by their JSON text.
pub fn value_matches_text(value: &Value, text: &str) -> bool {
    match value {
        Value::String(value) => value == text,
        Value::Number(number) => number.to_string() == text,
        Value::Bool(flag) => flag.to_string() == text,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    #[test]
    fn walks_nested_objects() {
        let record = record(json!({"data": {"consentId": "X", "status": "OK"}}));
        assert_eq!(lookup_path(&record, "data.consentId"), Some(&json!("X")));
        assert_eq!(lookup_path(&record, "data"), record.get("data"));
    }

    #[test]
    fn missing_segments_and_scalars_stop_the_walk() {
        let record = record(json!({"data": {"consentId": "X"}, "id": "1"}));
        assert_eq!(lookup_path(&record, "data.accountId"), None);
        assert_eq!(lookup_path(&record, "id.value"), None);
        assert_eq!(lookup_path(&record, "missing"), None);
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_falsy(&value), "{value}");
        }
        for value in [json!(true), json!(1), json!("0"), json!([0]), json!({"a": 1})] {
            assert!(!is_falsy(&value), "{value}");
        }
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"id": [7, 2.5]}), &json!({"id": [7.0, 2.5]})));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!({"id": 1}), &json!({"id": 1, "x": 2})));
        assert!(values_equal(&json!("urn:a"), &json!("urn:a")));
    }

    #[test]
    fn textual_comparison() {
        assert!(value_matches_text(&json!("abc"), "abc"));
        assert!(value_matches_text(&json!(42), "42"));
        assert!(value_matches_text(&json!(true), "true"));
        assert!(!value_matches_text(&json!(null), "null"));
        assert!(!value_matches_text(&json!(["abc"]), "abc"));
    }
}
