// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config patches: diff a full config against a parent, merge a patch back
//!
//! A patch holds only the keys of a full config whose values differ from the
//! parent. Arrays are atomic: a changed array is stored whole. Diffing is
//! one-directional, so keys that only exist on the parent never show up in a
//! patch.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::{json_type_name, PatchError};
use crate::path;
use crate::types::GrapherConfig;

/// Keys a chart never inherits from its parent chart
pub const NON_INHERITABLE_KEYS: [&str; 5] = ["$schema", "id", "slug", "version", "isPublished"];

/// Options for [`diff_with_options`]
#[derive(Debug, Clone, Default)]
pub struct DiffOptions<'a> {
    /// Key paths stripped from the full config before diffing
    pub omit_keys: Vec<String>,
    /// Key paths always written to the patch, even when equal to the parent
    pub persist_keys: Vec<String>,
    /// Defaults layered under the full config when resolving persisted keys
    pub defaults: Option<&'a GrapherConfig>,
}

impl<'a> DiffOptions<'a> {
    /// Options that strip the given keys and persist nothing
    #[must_use]
    pub fn omitting<S: AsRef<str>>(keys: &[S]) -> Self {
        Self {
            omit_keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Add keys that must be persisted regardless of equality
    #[must_use]
    pub fn persisting<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.persist_keys
            .extend(keys.iter().map(|k| k.as_ref().to_string()));
        self
    }

    /// Resolve persisted keys against these defaults
    #[must_use]
    pub fn with_defaults(mut self, defaults: &'a GrapherConfig) -> Self {
        self.defaults = Some(defaults);
        self
    }
}

/// Compute the patch that turns `parent` into `full`.
///
/// `omit_keys` are dotted key paths removed from `full` first; they never
/// appear in the patch.
#[must_use]
pub fn diff(full: &GrapherConfig, parent: &GrapherConfig, omit_keys: &[&str]) -> GrapherConfig {
    let stripped = strip_keys(full, omit_keys);
    diff_objects(&stripped, parent)
}

/// [`diff`], then force-include the persist-regardless keys.
///
/// Persisted values come from `defaults` merged with `full`, so a key left
/// at its default is still written out. An omitted key is never persisted.
#[must_use]
pub fn diff_with_options(
    full: &GrapherConfig,
    parent: &GrapherConfig,
    options: &DiffOptions<'_>,
) -> GrapherConfig {
    let omit: Vec<&str> = options.omit_keys.iter().map(String::as_str).collect();
    let mut patch = diff(full, parent, &omit);

    if options.persist_keys.is_empty() {
        return patch;
    }

    let resolved = match options.defaults {
        Some(defaults) => Cow::Owned(merge(defaults, full)),
        None => Cow::Borrowed(full),
    };
    for key in &options.persist_keys {
        if is_omitted(key, &options.omit_keys) {
            continue;
        }
        if let Some(value) = path::get(&resolved, key) {
            tracing::trace!(key = %key, "persisting key regardless of parent value");
            path::set(&mut patch, key, value.clone());
        }
    }
    patch
}

/// Whether `key` is an omitted path or lies beneath one
fn is_omitted(key: &str, omit_keys: &[String]) -> bool {
    omit_keys.iter().any(|omit| {
        key.strip_prefix(omit.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

/// Deep-merge `patch` onto a copy of `parent`.
///
/// Objects on both sides merge recursively; anything else in the patch
/// replaces the parent's value outright.
#[must_use]
pub fn merge(parent: &GrapherConfig, patch: &GrapherConfig) -> GrapherConfig {
    let mut merged = parent.clone();
    merge_into(&mut merged, patch);
    merged
}

/// Fold [`merge`] over layers, lowest precedence first
#[must_use]
pub fn merge_layers<'a, I>(layers: I) -> GrapherConfig
where
    I: IntoIterator<Item = &'a GrapherConfig>,
{
    let mut merged = GrapherConfig::new();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

/// Three-tier resolution: defaults, then parent chart, then chart patch.
///
/// The parent's [`NON_INHERITABLE_KEYS`] are dropped before merging.
#[must_use]
pub fn resolve_effective(
    defaults: &GrapherConfig,
    parent: &GrapherConfig,
    patch: &GrapherConfig,
) -> GrapherConfig {
    let inherited = strip_keys(parent, &NON_INHERITABLE_KEYS);
    merge_layers([defaults, &inherited, patch])
}

/// [`diff`] over arbitrary JSON; `null` counts as an empty config
pub fn diff_values(full: &Value, parent: &Value, omit_keys: &[&str]) -> Result<Value, PatchError> {
    let full = as_config(full, "full")?;
    let parent = as_config(parent, "parent")?;
    Ok(Value::Object(diff(&full, &parent, omit_keys)))
}

/// [`merge`] over arbitrary JSON; `null` counts as an empty config
pub fn merge_values(parent: &Value, patch: &Value) -> Result<Value, PatchError> {
    let parent = as_config(parent, "parent")?;
    let patch = as_config(patch, "patch")?;
    Ok(Value::Object(merge(&parent, &patch)))
}

/// View a JSON value as a config object, treating `null` as empty
pub fn as_config<'a>(
    value: &'a Value,
    argument: &'static str,
) -> Result<Cow<'a, GrapherConfig>, PatchError> {
    match value {
        Value::Object(map) => Ok(Cow::Borrowed(map)),
        Value::Null => Ok(Cow::Owned(GrapherConfig::new())),
        other => Err(PatchError::NotAnObject {
            argument,
            found: json_type_name(other),
        }),
    }
}

fn strip_keys(config: &GrapherConfig, keys: &[&str]) -> GrapherConfig {
    let mut stripped = config.clone();
    for key in keys {
        path::remove(&mut stripped, key);
    }
    stripped
}

fn diff_objects(full: &Map<String, Value>, parent: &Map<String, Value>) -> Map<String, Value> {
    let mut patch = Map::new();
    for (key, value) in full {
        match (value, parent.get(key)) {
            (Value::Object(child), Some(Value::Object(reference))) => {
                let nested = diff_objects(child, reference);
                if !nested.is_empty() {
                    patch.insert(key.clone(), Value::Object(nested));
                }
            }
            (_, Some(reference)) if reference == value => {}
            _ => {
                patch.insert(key.clone(), value.clone());
            }
        }
    }
    patch
}

fn merge_into(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) = (target.get_mut(key), value) {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
