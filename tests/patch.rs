// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scenario tests for config diff, merge and layered resolution

use grapher_config::defaults::grapher_defaults;
use grapher_config::narrative::NarrativeView;
use grapher_config::patch::{
    diff, diff_values, diff_with_options, merge, merge_layers, merge_values, resolve_effective,
    DiffOptions,
};
use grapher_config::schema::latest_schema_url;
use grapher_config::types::GrapherConfig;
use grapher_config::PatchError;
use serde_json::{json, Value};

// =============================================================================
// Test Helpers
// =============================================================================

fn config(value: Value) -> GrapherConfig {
    match value {
        Value::Object(map) => map,
        other => panic!("test config must be an object, got {other}"),
    }
}

fn parent_chart() -> GrapherConfig {
    config(json!({
        "$schema": latest_schema_url(),
        "id": 42,
        "slug": "life-expectancy",
        "isPublished": true,
        "title": "Life expectancy",
        "chartTypes": ["LineChart"],
        "dimensions": [{"property": "y", "variableId": 123}],
        "selectedEntityNames": ["France", "Germany"],
        "map": {"time": 2020, "region": "World", "colorScale": {"baseColorScheme": "YlGnBu"}}
    }))
}

// =============================================================================
// Diff
// =============================================================================

#[test]
fn test_diff_keeps_only_changed_keys() {
    let parent = parent_chart();
    let mut full = parent.clone();
    full.insert("title".into(), json!("Life expectancy in Europe"));
    full.insert("subtitle".into(), json!("Period life expectancy at birth"));

    let patch = diff(&full, &parent, &[]);

    assert_eq!(
        Value::Object(patch),
        json!({
            "title": "Life expectancy in Europe",
            "subtitle": "Period life expectancy at birth"
        })
    );
}

#[test]
fn test_diff_of_identical_configs_is_empty() {
    let parent = parent_chart();
    assert!(diff(&parent, &parent, &[]).is_empty());
}

#[test]
fn test_diff_nested_change_keeps_only_the_leaf() {
    let parent = parent_chart();
    let full = merge(&parent, &config(json!({"map": {"colorScale": {"baseColorScheme": "Reds"}}})));

    let patch = diff(&full, &parent, &[]);

    assert_eq!(
        Value::Object(patch),
        json!({"map": {"colorScale": {"baseColorScheme": "Reds"}}})
    );
}

#[test]
fn test_diff_is_one_directional() {
    let parent = config(json!({"title": "A", "subtitle": "only on parent"}));
    let full = config(json!({"title": "A"}));
    assert!(diff(&full, &parent, &[]).is_empty());
}

#[test]
fn test_diff_strips_omitted_keys_including_nested_paths() {
    let parent = parent_chart();
    let full = merge(
        &parent,
        &config(json!({"id": 7, "isPublished": false, "map": {"time": 1990}, "title": "Changed"})),
    );

    let patch = diff(&full, &parent, &["id", "isPublished", "map.time"]);

    assert_eq!(Value::Object(patch), json!({"title": "Changed"}));
}

#[test]
fn test_persist_keys_are_forced_even_when_equal() {
    let parent = parent_chart();
    let full = parent.clone();

    let options = DiffOptions::omitting(&["id"]).persisting(&["selectedEntityNames"]);
    let patch = diff_with_options(&full, &parent, &options);

    assert_eq!(
        Value::Object(patch),
        json!({"selectedEntityNames": ["France", "Germany"]})
    );
}

#[test]
fn test_persist_keys_fall_back_to_defaults() {
    let parent = config(json!({"title": "A"}));
    let full = config(json!({"title": "A"}));

    let options = DiffOptions::default()
        .persisting(&["selectedEntityNames", "hasMapTab"])
        .with_defaults(grapher_defaults());
    let patch = diff_with_options(&full, &parent, &options);

    assert_eq!(
        Value::Object(patch),
        json!({"selectedEntityNames": [], "hasMapTab": false})
    );
}

#[test]
fn test_omitted_key_is_never_persisted() {
    let parent = parent_chart();
    let options = DiffOptions::omitting(&["id"]).persisting(&["id"]);
    assert!(diff_with_options(&parent, &parent, &options).is_empty());
}

#[test]
fn test_persist_key_under_omitted_path_is_dropped() {
    let parent = config(json!({"map": {"time": 2000, "region": "World"}, "title": "A"}));
    let options = DiffOptions::omitting(&["map"]).persisting(&["map.time", "title"]);

    let patch = diff_with_options(&parent, &parent, &options);

    assert_eq!(Value::Object(patch), json!({"title": "A"}));
}

#[test]
fn test_omit_prefix_only_matches_whole_segments() {
    let parent = config(json!({"map": {"time": 2000}, "mapTab": true}));
    let options = DiffOptions::omitting(&["map"]).persisting(&["mapTab"]);

    let patch = diff_with_options(&parent, &parent, &options);

    assert_eq!(Value::Object(patch), json!({"mapTab": true}));
}

// =============================================================================
// Merge
// =============================================================================

#[test]
fn test_merge_round_trips_a_diff() {
    let parent = parent_chart();
    let full = merge(
        &parent,
        &config(json!({
            "title": "Changed",
            "selectedEntityNames": ["Spain"],
            "map": {"region": "Europe"}
        })),
    );

    let patch = diff(&full, &parent, &[]);
    assert_eq!(merge(&parent, &patch), full);
}

#[test]
fn test_merge_does_not_mutate_inputs() {
    let parent = parent_chart();
    let patch = config(json!({"map": {"time": 1800}}));
    let (parent_before, patch_before) = (parent.clone(), patch.clone());

    let merged = merge(&parent, &patch);

    assert_eq!(parent, parent_before);
    assert_eq!(patch, patch_before);
    assert_eq!(merged["map"]["time"], json!(1800));
    assert_eq!(merged["map"]["region"], json!("World"));
}

#[test]
fn test_merge_identities() {
    let parent = parent_chart();
    let empty = GrapherConfig::new();
    assert_eq!(merge(&parent, &empty), parent);
    assert_eq!(merge(&empty, &parent), parent);
}

#[test]
fn test_merge_layers_later_layers_win() {
    let defaults = config(json!({"title": "", "hasMapTab": false, "map": {"region": "World"}}));
    let parent = config(json!({"title": "Parent", "map": {"time": 2000}}));
    let patch = config(json!({"title": "Child"}));

    let merged = merge_layers([&defaults, &parent, &patch]);

    assert_eq!(
        Value::Object(merged),
        json!({"title": "Child", "hasMapTab": false, "map": {"region": "World", "time": 2000}})
    );
}

#[test]
fn test_resolve_effective_does_not_inherit_identity_keys() {
    let parent = parent_chart();
    let patch = config(json!({"title": "Narrative title"}));

    let effective = resolve_effective(grapher_defaults(), &parent, &patch);

    assert_eq!(effective["title"], json!("Narrative title"));
    assert_eq!(effective["$schema"], json!(latest_schema_url()));
    assert!(!effective.contains_key("id"));
    assert!(!effective.contains_key("slug"));
    assert!(!effective.contains_key("isPublished"));
    assert_eq!(effective["dimensions"], parent["dimensions"]);
    assert_eq!(effective["hasMapTab"], json!(false));
}

// =============================================================================
// Value-level entry points
// =============================================================================

#[test]
fn test_null_inputs_are_empty_configs() {
    assert_eq!(merge_values(&Value::Null, &json!({"a": 1})).unwrap(), json!({"a": 1}));
    assert_eq!(merge_values(&json!({"a": 1}), &Value::Null).unwrap(), json!({"a": 1}));
    assert_eq!(diff_values(&json!({"a": 1}), &Value::Null, &[]).unwrap(), json!({"a": 1}));
}

#[test]
fn test_non_object_inputs_fail_fast() {
    assert_eq!(
        merge_values(&json!("nope"), &json!({})),
        Err(PatchError::NotAnObject { argument: "parent", found: "string" })
    );
    assert_eq!(
        diff_values(&json!(3), &json!({}), &[]),
        Err(PatchError::NotAnObject { argument: "full", found: "number" })
    );
}

// =============================================================================
// Narrative views
// =============================================================================

#[test]
fn test_narrative_view_stores_minimal_patch() {
    let parent = parent_chart();
    let full = merge(
        &parent,
        &config(json!({
            "id": 99,
            "dimensions": [{"property": "y", "variableId": 999}],
            "subtitle": "A narrative view"
        })),
    );

    let view = NarrativeView::from_full_config("europe-view", 42, &full, &parent);

    assert_eq!(
        Value::Object(view.patch.clone()),
        json!({
            "subtitle": "A narrative view",
            "selectedEntityNames": ["France", "Germany"],
            "$schema": latest_schema_url()
        })
    );
}

#[test]
fn test_narrative_view_resolves_on_top_of_parent() {
    let parent = parent_chart();
    let full = merge(
        &parent,
        &config(json!({"selectedEntityNames": ["Spain"], "map": {"time": 1990}})),
    );

    let view = NarrativeView::from_full_config("spain", 42, &full, &parent);
    let effective = view.resolve(&parent);

    assert_eq!(effective["selectedEntityNames"], json!(["Spain"]));
    assert_eq!(effective["map"]["time"], json!(1990));
    assert_eq!(effective["map"]["region"], json!("World"));
    assert_eq!(effective["title"], json!("Life expectancy"));
    assert_eq!(effective["dimensions"], parent["dimensions"]);
    assert!(!effective.contains_key("id"));
}

#[test]
fn test_narrative_view_serializes_camel_case() {
    let view = NarrativeView {
        name: "v".into(),
        parent_chart_id: 1,
        patch: GrapherConfig::new(),
    };
    let value = serde_json::to_value(&view).unwrap();
    assert_eq!(value, json!({"name": "v", "parentChartId": 1, "patch": {}}));
}
