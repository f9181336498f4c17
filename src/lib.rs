// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! grapher-config library - chart configuration core for Grapher
//!
//! This crate provides the three engines behind Grapher chart configs:
//! patch diff/merge between a chart and its parent, migration of configs
//! across `$schema` versions, and color-scale binning for legends and
//! choropleth maps.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color_scale;
pub mod commands;
pub mod config;
pub mod defaults;
pub mod error;
pub mod narrative;
pub mod patch;
pub mod path;
pub mod schema;

pub use error::{Error, PatchError, Result, SchemaError};

/// Core data types shared by the engines
pub mod types {
    use serde_json::{Map, Value};

    /// A chart configuration: a nested JSON object carrying a `$schema` field
    pub type GrapherConfig = Map<String, Value>;

    /// Key holding the schema URL
    pub const SCHEMA_KEY: &str = "$schema";

    /// Color used for values with no data
    pub const DEFAULT_NO_DATA_COLOR: &str = "#eee";

    /// Label of the synthetic "No data" legend bucket
    pub const NO_DATA_LABEL: &str = "No data";

    /// Parse a JSON string into a config, rejecting non-object documents
    pub fn parse_config(json: &str) -> crate::Result<GrapherConfig> {
        let value: Value = serde_json::from_str(json)?;
        let config = crate::patch::as_config(&value, "config")?;
        Ok(config.into_owned())
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::color_scale::{
        BinningStrategy, CategoricalBin, ColorScale, ColorScaleBin, ColorScaleConfig,
        ColorScaleOptions, LegendValue, NumericBin,
    };
    pub use crate::defaults::grapher_defaults;
    pub use crate::narrative::NarrativeView;
    pub use crate::patch::{diff, diff_with_options, merge, resolve_effective, DiffOptions};
    pub use crate::schema::{migrate_to_latest, SchemaVersion};
    pub use crate::types::*;
}
