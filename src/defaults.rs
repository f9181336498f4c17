// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Default grapher config at the latest schema version
//!
//! The bottom layer of three-tier resolution and the source of values for
//! persist-regardless keys that a chart leaves at their default.

use once_cell::sync::Lazy;
use serde_json::json;

use crate::schema::{latest_schema_url, DEFAULT_BIN_COUNT};
use crate::types::{GrapherConfig, DEFAULT_NO_DATA_COLOR};

static DEFAULTS: Lazy<GrapherConfig> = Lazy::new(|| {
    let value = json!({
        "$schema": latest_schema_url(),
        "title": "",
        "subtitle": "",
        "chartTypes": ["LineChart"],
        "hasMapTab": false,
        "tab": "chart",
        "selectedEntityNames": [],
        "hideLegend": false,
        "colorScale": {
            "binningStrategy": "equalInterval",
            "binningStrategyBinCount": DEFAULT_BIN_COUNT,
            "colorSchemeInvert": false,
            "customNumericColorsActive": false
        },
        "map": {
            "region": "World",
            "colorScale": {
                "binningStrategy": "equalInterval",
                "binningStrategyBinCount": DEFAULT_BIN_COUNT,
                "colorSchemeInvert": false,
                "customNumericColorsActive": false,
                "noDataColor": DEFAULT_NO_DATA_COLOR
            }
        }
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => GrapherConfig::new(),
    }
});

/// The built-in grapher defaults
#[must_use]
pub fn grapher_defaults() -> &'static GrapherConfig {
    &DEFAULTS
}
