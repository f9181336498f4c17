// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use grapher_config::color_scale::{ColorScale, ColorScaleConfig, ColorScaleOptions, LegendValue};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, Vec<f64>, Vec<String>)| {
    let (config_json, values, categories) = input;
    let config = serde_json::from_str::<serde_json::Value>(config_json)
        .map(|value| ColorScaleConfig::from_value(&value))
        .unwrap_or_default();
    let scale = ColorScale::new(config, ColorScaleOptions::default().with_no_data_bin())
        .with_numeric_values(values.iter().copied())
        .with_categorical_values(categories);

    let bins = scale.bins();
    assert!(scale.base_colors().len() >= bins.len());
    for value in values.iter().filter(|v| v.is_finite()) {
        let _ = scale.get_color(Some(&LegendValue::Number(*value)));
    }
});
