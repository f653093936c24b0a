// Case-insensitive helpers over the JSON value tree

use serde_json::{Map, Number, Value};

/// Separators accepted between path segments: `redis:db_number`,
/// `redis.db_number`.
const SEPARATORS: [char; 2] = [':', '.'];

/// Canonical form of a key: lowercase with `_` and `-` removed.
///
/// `ConnectionString`, `connection_string`, `CONNECTION_STRING` and
/// `connection-string` all normalize to `connectionstring`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn keys_match(a: &str, b: &str) -> bool {
    normalize_key(a) == normalize_key(b)
}

/// Split a key path into its segments, dropping empty ones.
pub fn split_path(path: &str) -> Vec<String> {
    path.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// The key already stored in `map` that matches `key`, if any.
pub(crate) fn find_key(map: &Map<String, Value>, key: &str) -> Option<String> {
    let wanted = normalize_key(key);
    map.keys().find(|k| normalize_key(k) == wanted).cloned()
}

pub(crate) fn lookup<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |node, segment| match node {
        Value::Object(map) => map
            .iter()
            .find(|(k, _)| keys_match(k, segment))
            .map(|(_, v)| v),
        _ => None,
    })
}

/// Set `value` at `segments`, creating intermediate objects and replacing
/// any scalar that sits where an object is needed.
pub(crate) fn insert_path(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    let key = find_key(map, head).unwrap_or_else(|| head.clone());

    if rest.is_empty() {
        map.insert(key, value);
        return;
    }

    let child = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child) = child {
        insert_path(child, rest, value);
    }
}

/// Deep-merge `source` into `target`; values from `source` win.
pub(crate) fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        let Some(existing) = find_key(target, &key) else {
            target.insert(key, value);
            continue;
        };

        if let Some(slot) = target.get_mut(&existing) {
            match (slot, value) {
                (Value::Object(slot), Value::Object(incoming)) => merge(slot, incoming),
                (slot, incoming) => *slot = incoming,
            }
        }
    }
}

/// Overlay configuration values onto the serialized form of a target value.
///
/// Keys present in `source` replace the matching keys of `target`; keys
/// absent from `source` are left alone, and so are keys whose source value
/// is `null`. String leaves are coerced to the scalar type already present
/// in `target`.
pub(crate) fn overlay(target: &mut Value, source: &Value) {
    match (target, source) {
        (_, Value::Null) => {}
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source.iter().filter(|(_, v)| !v.is_null()) {
                match find_key(target, key) {
                    Some(existing) => {
                        if let Some(slot) = target.get_mut(&existing) {
                            overlay(slot, value);
                        }
                    }
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = coerce(target, source),
    }
}

fn coerce(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Number(_), Value::String(text)) => {
            parse_number(text.trim()).unwrap_or_else(|| source.clone())
        }
        (Value::Bool(_), Value::String(text)) => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Value::Bool(true),
            "false" | "0" | "no" | "off" => Value::Bool(false),
            _ => source.clone(),
        },
        (Value::String(_), Value::Number(n)) => Value::String(n.to_string()),
        (Value::String(_), Value::Bool(b)) => Value::String(b.to_string()),
        _ => source.clone(),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(Value::from(u));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
