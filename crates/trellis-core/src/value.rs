//! Helpers over `serde_json::Value` shared by node properties, locale trees
//! and option lists.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot descend into `{segment}`: parent is not an object or array")]
    NotContainer { segment: String },
    #[error("index {index} is out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("empty path")]
    EmptyPath,
}

/// Truthiness as the host form model sees it: `null`, `false`, `0`, `NaN`
/// and `""` are falsy, every array and object is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Walks `segments` through nested objects and arrays.
///
/// Array levels accept numeric segments only. Returns `None` as soon as a
/// segment is missing.
pub fn get_in<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Same as [`get_in`] but starting from an object map.
pub fn get_in_map<'a, S: AsRef<str>>(root: &'a Map<String, Value>, segments: &[S]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let head = root.get(first.as_ref())?;
    get_in(head, rest)
}

/// Writes `value` at `segments`, creating intermediate objects (or arrays,
/// when the next segment is numeric) where nothing exists yet.
///
/// Writing one past the end of an array appends.
pub fn set_in<S: AsRef<str>>(
    root: &mut Map<String, Value>,
    segments: &[S],
    value: Value,
) -> Result<(), ValueError> {
    let (first, rest) = segments.split_first().ok_or(ValueError::EmptyPath)?;
    let first = first.as_ref();
    if rest.is_empty() {
        root.insert(first.to_owned(), value);
        return Ok(());
    }
    let slot = root
        .entry(first.to_owned())
        .or_insert_with(|| empty_container_for(rest[0].as_ref()));
    set_in_value(slot, rest, value)
}

fn set_in_value<S: AsRef<str>>(
    target: &mut Value,
    segments: &[S],
    value: Value,
) -> Result<(), ValueError> {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };
    let first = first.as_ref();
    if target.is_null() {
        *target = empty_container_for(first);
    }
    let slot = match target {
        Value::Object(map) => {
            let next = rest.first().map(|segment| segment.as_ref());
            map.entry(first.to_owned())
                .or_insert_with(|| next.map(empty_container_for).unwrap_or(Value::Null))
        }
        Value::Array(items) => {
            let index = first.parse::<usize>().map_err(|_| ValueError::NotContainer {
                segment: first.to_owned(),
            })?;
            let len = items.len();
            if index == len {
                let next = rest.first().map(|segment| segment.as_ref());
                items.push(next.map(empty_container_for).unwrap_or(Value::Null));
            }
            items
                .get_mut(index)
                .ok_or(ValueError::IndexOutOfBounds { index, len })?
        }
        _ => {
            return Err(ValueError::NotContainer {
                segment: first.to_owned(),
            })
        }
    };
    set_in_value(slot, rest, value)
}

fn empty_container_for(next_segment: &str) -> Value {
    if next_segment.parse::<usize>().is_ok() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Recursively merges `patch` into `target`. Objects merge key by key,
/// anything else in `patch` replaces what `target` held.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        existing.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
