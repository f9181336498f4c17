// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for patching, migration and binning
//!
//! These tests verify critical invariants over generated inputs:
//! 1. Patch fidelity - merging a diff back onto its parent restores the config
//! 2. Migration convergence - every known version ends at the latest, idempotently
//! 3. Bin coverage - legend bins span the data and never run out of colors

use grapher_config::color_scale::{
    BinningStrategy, ColorScale, ColorScaleBin, ColorScaleConfig, ColorScaleOptions, LegendValue,
};
use grapher_config::patch::{diff, merge};
use grapher_config::schema::{is_latest, migrate_to_latest, schema_url, SchemaVersion};
use grapher_config::types::GrapherConfig;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// =============================================================================
// Generators
// =============================================================================

/// Small key set so generated parents and children collide often
const KEYS: [&str; 5] = ["a", "b", "c", "map", "title"];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{0,3}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::btree_map(prop::sample::select(KEYS.to_vec()), inner, 0..4)
                .prop_map(|entries| {
                    Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
                }),
        ]
    })
}

fn grapher_config() -> impl Strategy<Value = GrapherConfig> {
    prop::collection::btree_map(prop::sample::select(KEYS.to_vec()), json_value(), 0..5)
        .prop_map(|entries| entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn any_version() -> impl Strategy<Value = SchemaVersion> {
    prop::sample::select(SchemaVersion::ALL.to_vec())
}

/// Configs at any version, carrying fields the migrations touch
fn legacy_config() -> impl Strategy<Value = GrapherConfig> {
    (
        any_version(),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec!["LineChart", "ScatterPlot", "Marimekko"])),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec!["Reds", "Blues", "BuGn"])),
        prop::option::of(-5i64..50),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(version, auto_title, chart_type, chart_tab, scheme, bin_count, manual)| {
            let mut config = Map::new();
            config.insert("$schema".into(), json!(schema_url(version)));
            config.insert("title".into(), json!("Generated"));
            if let Some(flag) = auto_title {
                config.insert("isAutoTitle".into(), json!(flag));
            }
            if let Some(chart_type) = chart_type {
                config.insert("type".into(), json!(chart_type));
            }
            if let Some(flag) = chart_tab {
                config.insert("hasChartTab".into(), json!(flag));
            }
            if let Some(scheme) = scheme {
                config.insert("baseColorScheme".into(), json!(scheme));
            }
            let mut scale = Map::new();
            if let Some(count) = bin_count {
                scale.insert("binningStrategyBinCount".into(), json!(count));
            }
            if let Some(flag) = manual {
                scale.insert("isManualBuckets".into(), json!(flag));
            }
            config.insert(
                "map".into(),
                json!({"targetYear": 2000, "colorScale": Value::Object(scale)}),
            );
            config
        })
}

fn automatic_strategy() -> impl Strategy<Value = BinningStrategy> {
    prop::sample::select(vec![
        BinningStrategy::EqualInterval,
        BinningStrategy::Quantiles,
        BinningStrategy::Ckmeans,
    ])
}

fn data_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10_000.0f64..10_000.0, 1..40)
}

fn categories() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["Africa", "Asia", "Europe", "Oceania", "Americas"]),
        0..8,
    )
    .prop_map(|values| values.into_iter().map(String::from).collect())
}

/// Every leaf of `expected` holds the same value in `actual`
fn subsumes(expected: &GrapherConfig, actual: &GrapherConfig) -> bool {
    expected.iter().all(|(key, value)| match (value, actual.get(key)) {
        (Value::Object(nested), Some(Value::Object(other))) => subsumes(nested, other),
        (value, Some(other)) => value == other,
        (_, None) => false,
    })
}

proptest! {
    // =========================================================================
    // Patch fidelity
    // =========================================================================

    #[test]
    fn prop_merge_of_diff_restores_full(full in grapher_config(), parent in grapher_config()) {
        let patch = diff(&full, &parent, &[]);
        let merged = merge(&parent, &patch);
        prop_assert!(subsumes(&full, &merged), "full={full:?} merged={merged:?}");
    }

    #[test]
    fn prop_omitted_keys_never_reach_the_patch(full in grapher_config(), parent in grapher_config()) {
        let patch = diff(&full, &parent, &["a", "map"]);
        prop_assert!(!patch.contains_key("a"));
        prop_assert!(!patch.contains_key("map"));

        let mut expected = full.clone();
        expected.remove("a");
        expected.remove("map");
        prop_assert!(subsumes(&expected, &merge(&parent, &patch)));
    }

    #[test]
    fn prop_merge_identities(config in grapher_config()) {
        let empty = GrapherConfig::new();
        prop_assert_eq!(&merge(&config, &empty), &config);
        prop_assert_eq!(&merge(&empty, &config), &config);
    }

    #[test]
    fn prop_self_diff_is_empty(config in grapher_config()) {
        prop_assert!(diff(&config, &config, &[]).is_empty());
    }

    // =========================================================================
    // Migration convergence
    // =========================================================================

    #[test]
    fn prop_migration_reaches_latest_idempotently(config in legacy_config()) {
        let before = config.clone();
        let started_latest = is_latest(&config);
        let once = migrate_to_latest(&config).unwrap();
        prop_assert_eq!(&config, &before);
        prop_assert!(is_latest(&once));

        let twice = migrate_to_latest(&once).unwrap();
        prop_assert_eq!(&twice, &once);

        if started_latest {
            prop_assert_eq!(&once, &config);
        } else if let Some(count) = once
            .get("map")
            .and_then(|m| m.get("colorScale"))
            .and_then(|s| s.get("binningStrategyBinCount"))
            .and_then(Value::as_u64)
        {
            prop_assert!((1..=20).contains(&count));
        }
    }

    // =========================================================================
    // Bin coverage
    // =========================================================================

    #[test]
    fn prop_automatic_bins_cover_every_value(
        values in data_values(),
        strategy in automatic_strategy(),
        bin_count in prop::option::of(1usize..9),
    ) {
        let config = ColorScaleConfig {
            binning_strategy: strategy,
            binning_strategy_bin_count: bin_count,
            ..ColorScaleConfig::default()
        };
        let scale = ColorScale::new(config, ColorScaleOptions::default())
            .with_numeric_values(values.iter().copied());

        let maximums = scale.bin_maximums();
        prop_assert!(!maximums.is_empty());
        prop_assert!(maximums.windows(2).all(|w| w[0] <= w[1]), "{maximums:?}");

        let bins = scale.numeric_bins();
        prop_assert_eq!(bins[0].min, scale.min_bin_value());
        for pair in bins.windows(2) {
            prop_assert_eq!(pair[0].max, pair[1].min);
        }
        for value in &values {
            prop_assert!(
                scale.get_color(Some(&LegendValue::Number(*value))).is_some(),
                "no bin for {} in {:?}", value, bins
            );
        }
    }

    #[test]
    fn prop_manual_bins_flag_uncovered_edges(
        values in data_values(),
        mut boundaries in prop::collection::vec(-10_000.0f64..10_000.0, 0..6),
        bin_count in prop::option::of(0usize..8),
    ) {
        boundaries.sort_by(f64::total_cmp);
        let config = ColorScaleConfig {
            binning_strategy: BinningStrategy::Manual,
            binning_strategy_bin_count: bin_count,
            custom_numeric_values: boundaries.clone(),
            ..ColorScaleConfig::default()
        };
        let scale = ColorScale::new(config, ColorScaleOptions::default())
            .with_numeric_values(values.iter().copied());

        let expected_len = bin_count.map_or(boundaries.len(), |n| n.clamp(1, 20));
        let bins = scale.numeric_bins();
        prop_assert_eq!(bins.len(), expected_len);

        if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
            let data_min = scale.min_possible_value().unwrap();
            let data_max = scale.max_possible_value().unwrap();
            prop_assert!(first.min <= data_min || first.is_open_left);
            prop_assert!(last.max >= data_max || last.is_open_right);
        }
    }

    #[test]
    fn prop_every_bin_gets_a_color(
        values in prop::collection::vec(-100.0f64..100.0, 0..20),
        cats in categories(),
        no_data_bin in any::<bool>(),
        invert in any::<bool>(),
    ) {
        let config = ColorScaleConfig { color_scheme_invert: invert, ..ColorScaleConfig::default() };
        let mut options = ColorScaleOptions::default();
        options.has_no_data_bin = no_data_bin;
        let scale = ColorScale::new(config, options)
            .with_numeric_values(values)
            .with_categorical_values(cats);

        let bins = scale.bins();
        prop_assert_eq!(
            scale.base_colors().len(),
            scale.bin_maximums().len() + scale.categorical_legend_values().len()
        );
        prop_assert!(bins.iter().all(|bin| !bin.color().is_empty()));
        prop_assert_eq!(scale.get_color(None), Some(scale.no_data_color().to_string()));

        if no_data_bin {
            let last = bins.last().and_then(ColorScaleBin::as_categorical);
            prop_assert_eq!(last.map(|b| b.value.as_str()), Some("No data"));
        }
    }
}
