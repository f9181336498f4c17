// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dotted key paths into nested config objects (`map.colorScale.baseColorScheme`)

use serde_json::{Map, Value};

/// Look up the value at a dotted path
#[must_use]
pub fn get<'a>(config: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (parents, leaf) = split(path);
    let mut current = config;
    for segment in parents {
        current = current.get(segment)?.as_object()?;
    }
    current.get(leaf)
}

/// Look up the object at a dotted path, mutably
pub fn get_object_mut<'a>(
    config: &'a mut Map<String, Value>,
    path: &str,
) -> Option<&'a mut Map<String, Value>> {
    let mut current = config;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    Some(current)
}

/// Remove and return the value at a dotted path.
///
/// Intermediate objects are left in place even when they become empty.
pub fn remove(config: &mut Map<String, Value>, path: &str) -> Option<Value> {
    let (parents, leaf) = split(path);
    let mut current = config;
    for segment in parents {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    current.remove(leaf)
}

/// Set the value at a dotted path, creating intermediate objects as needed.
///
/// A non-object value sitting on the path is replaced by an object.
pub fn set(config: &mut Map<String, Value>, path: &str, value: Value) {
    let (parents, leaf) = split(path);
    let mut current = config;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(leaf.to_string(), value);
}

fn split(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop().unwrap_or_default();
    (segments, leaf)
}
