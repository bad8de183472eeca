use serde_json::{Map, Value};

/// Parse a payload that should be a JSON object but was stored as text.
///
/// Returns an empty map when the text is not valid JSON or does not encode
/// an object. Callers treat the empty map as "no stored data".
pub fn parse_embedded_object(text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Coerce an already-parsed JSON value into an object map.
///
/// Non-object values (arrays, numbers, strings that were double-decoded,
/// null) degrade to an empty map.
pub fn value_into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
