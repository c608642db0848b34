//! Form encoding of query options with bracket notation.
//!
//! Nested objects and arrays flatten into `key[sub]=value` and
//! `key[0]=value` pairs, the convention most HTTP form serializers share.
//! Keys and values are then `application/x-www-form-urlencoded`, so brackets
//! travel as `%5B` / `%5D`.
//!
//! [`decode`] is the inverse. Scalars come back as strings and contiguous
//! index keys (`0`, `1`, ...) below the top level come back as arrays.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Serialize `options` into a query string, without the leading `?`.
///
/// Returns `None` when the options produce no pairs (scalars, `{}`, `[]`),
/// so the caller can omit the `?` entirely.
pub fn encode(options: &Value) -> Option<String> {
    let mut pairs = Vec::new();
    match options {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(key.clone(), value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }
    if pairs.is_empty() {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Some(serializer.finish())
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{prefix}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), nested, pairs);
            }
        }
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Null => pairs.push((prefix, String::new())),
        other => pairs.push((prefix, other.to_string())),
    }
}

/// Parse a query string (without the leading `?`) back into a JSON object.
pub fn decode(query: &str) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let path = split_key(&key);
        insert(&mut root, &path, value.into_owned());
    }
    for value in root.values_mut() {
        normalize(value);
    }
    root
}

/// `a[b][0]` becomes `["a", "b", "0"]`. Keys with unbalanced brackets are
/// kept whole.
fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };
    if open == 0 || !key.ends_with(']') {
        return vec![key.to_string()];
    }

    let mut parts = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return vec![key.to_string()];
        };
        parts.push(stripped[..close].to_string());
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return vec![key.to_string()];
    }
    parts
}

fn insert(target: &mut Map<String, Value>, path: &[String], value: String) {
    let Some((head, tail)) = path.split_first() else {
        return;
    };
    // `a[]=x` appends.
    let key = if head.is_empty() {
        target.len().to_string()
    } else {
        head.clone()
    };

    if tail.is_empty() {
        target.insert(key, Value::String(value));
        return;
    }

    let slot = target
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(nested) = slot {
        insert(nested, tail, value);
    }
}

fn normalize(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };
    for nested in map.values_mut() {
        normalize(nested);
    }

    let is_sequence = !map.is_empty()
        && (0..map.len()).all(|index| map.contains_key(&index.to_string()));
    if is_sequence {
        let items = (0..map.len())
            .filter_map(|index| map.remove(&index.to_string()))
            .collect();
        *value = Value::Array(items);
    }
}
