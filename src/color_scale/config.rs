// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Typed view of a chart's `colorScale` sub-object

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::path;
use crate::types::{GrapherConfig, DEFAULT_NO_DATA_COLOR, NO_DATA_LABEL};

/// How a continuous range is cut into bins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinningStrategy {
    /// Bins of equal width starting at the minimum bin value
    #[default]
    EqualInterval,
    /// Bins holding roughly equal numbers of values
    Quantiles,
    /// Optimal 1-D k-means clusters
    Ckmeans,
    /// User-supplied bin maximums
    Manual,
}

/// Color scale settings embedded in a chart config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScaleConfig {
    /// Named color scheme the bin colors are drawn from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_scheme: Option<String>,
    /// Reverse the scheme's colors
    pub color_scheme_invert: bool,
    /// Binning strategy for numeric data
    pub binning_strategy: BinningStrategy,
    /// Number of numeric bins; integral floats such as `3.0` are accepted
    #[serde(
        default,
        deserialize_with = "deserialize_bin_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub binning_strategy_bin_count: Option<usize>,
    /// Lower bound of the first numeric bin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_numeric_min_value: Option<f64>,
    /// Bin maximums for the manual strategy
    pub custom_numeric_values: Vec<f64>,
    /// Per-bin label overrides
    pub custom_numeric_labels: Vec<Option<String>>,
    /// Per-bin color overrides
    pub custom_numeric_colors: Vec<Option<String>>,
    /// Whether `custom_numeric_colors` is applied
    pub custom_numeric_colors_active: bool,
    /// Per-category color overrides
    pub custom_category_colors: HashMap<String, String>,
    /// Per-category label overrides
    pub custom_category_labels: HashMap<String, String>,
    /// Categories flagged hidden in the legend
    pub custom_hidden_categories: HashMap<String, bool>,
    /// Text shown above the legend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_description: Option<String>,
    /// Color for values with no data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_data_color: Option<String>,
}

impl ColorScaleConfig {
    /// Extract the color scale at `key_path` (e.g. `map.colorScale`).
    ///
    /// A missing sub-object yields the defaults; a malformed one is logged
    /// and also yields the defaults.
    #[must_use]
    pub fn from_chart_config(config: &GrapherConfig, key_path: &str) -> Self {
        match path::get(config, key_path) {
            Some(value @ Value::Object(_)) => Self::from_value(value),
            Some(other) => {
                warn!(path = key_path, found = %other, "color scale is not an object, using defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Deserialize from a JSON object.
    ///
    /// Fields that fail to parse are logged and left at their defaults; the
    /// rest of the object is kept.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(object) = value else {
            warn!(found = %value, "color scale is not an object, using defaults");
            return Self::default();
        };
        match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(_) => Self::from_valid_fields(object),
        }
    }

    fn from_valid_fields(object: &Map<String, Value>) -> Self {
        let mut valid = Map::new();
        for (key, field) in object {
            let mut single = Map::new();
            single.insert(key.clone(), field.clone());
            match serde_json::from_value::<Self>(Value::Object(single)) {
                Ok(_) => {
                    valid.insert(key.clone(), field.clone());
                }
                Err(err) => {
                    warn!(field = %key, error = %err, "malformed color scale field, using default");
                }
            }
        }
        serde_json::from_value(Value::Object(valid)).unwrap_or_default()
    }

    /// Manual color override for numeric bin `index`, when active
    #[must_use]
    pub fn custom_numeric_color(&self, index: usize) -> Option<&str> {
        if !self.custom_numeric_colors_active {
            return None;
        }
        non_empty(self.custom_numeric_colors.get(index)?.as_deref())
    }

    /// Label override for numeric bin `index`
    #[must_use]
    pub fn custom_numeric_label(&self, index: usize) -> Option<&str> {
        non_empty(self.custom_numeric_labels.get(index)?.as_deref())
    }

    /// Whether a category is hidden in the legend
    #[must_use]
    pub fn is_category_hidden(&self, value: &str) -> bool {
        self.custom_hidden_categories.get(value).copied().unwrap_or(false)
    }
}

fn deserialize_bin_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        // Saturating cast; oversized counts are clamped when bins are computed
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as usize)),
        Some(n) => Err(D::Error::custom(format!("invalid bin count {n}"))),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Formats a categorical value into a legend label
pub type LabelFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Caller-side settings for bin computation
#[derive(Clone)]
pub struct ColorScaleOptions {
    /// Append a "No data" bucket to the categorical bins
    pub has_no_data_bin: bool,
    /// Scheme used when the config names none
    pub default_color_scheme: Option<String>,
    /// Color for values with no data, unless the config sets one
    pub no_data_color: String,
    /// Label of the "No data" bucket
    pub no_data_label: String,
    /// Label formatter for categorical values
    pub category_formatter: Option<LabelFormatter>,
}

impl Default for ColorScaleOptions {
    fn default() -> Self {
        Self {
            has_no_data_bin: false,
            default_color_scheme: None,
            no_data_color: DEFAULT_NO_DATA_COLOR.to_string(),
            no_data_label: NO_DATA_LABEL.to_string(),
            category_formatter: None,
        }
    }
}

impl fmt::Debug for ColorScaleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorScaleOptions")
            .field("has_no_data_bin", &self.has_no_data_bin)
            .field("default_color_scheme", &self.default_color_scheme)
            .field("no_data_color", &self.no_data_color)
            .field("no_data_label", &self.no_data_label)
            .field("category_formatter", &self.category_formatter.is_some())
            .finish()
    }
}

impl ColorScaleOptions {
    /// Enable the "No data" bucket
    #[must_use]
    pub fn with_no_data_bin(mut self) -> Self {
        self.has_no_data_bin = true;
        self
    }

    /// Set the categorical label formatter
    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.category_formatter = Some(Arc::new(formatter));
        self
    }
}
