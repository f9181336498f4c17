// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Color-scale binning for legends and choropleth maps
//!
//! Bins are recomputed from the config and data on every call. Degenerate
//! input (no values, zero bins, short manual boundary lists) produces an
//! empty or padded legend, never an error.

pub mod binning;
pub mod bins;
pub mod config;
pub mod palette;

use std::collections::HashSet;

use tracing::debug;

pub use binning::{bin_maximums, round_to_sig_fig};
pub use bins::{CategoricalBin, ColorScaleBin, LegendValue, NumericBin};
pub use config::{BinningStrategy, ColorScaleConfig, ColorScaleOptions, LabelFormatter};
pub use palette::{ColorScheme, DEFAULT_COLOR_SCHEME};

/// A color scale over one dataset
#[derive(Debug, Clone, Default)]
pub struct ColorScale {
    config: ColorScaleConfig,
    options: ColorScaleOptions,
    sorted_values: Vec<f64>,
    categorical_values: Vec<String>,
}

impl ColorScale {
    /// Create a scale with no data
    #[must_use]
    pub fn new(config: ColorScaleConfig, options: ColorScaleOptions) -> Self {
        Self {
            config,
            options,
            sorted_values: Vec::new(),
            categorical_values: Vec::new(),
        }
    }

    /// Set the numeric values; non-finite values are dropped and the rest sorted
    #[must_use]
    pub fn with_numeric_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.sorted_values = sorted_finite(values);
        self
    }

    /// Set the categorical values, in legend order
    #[must_use]
    pub fn with_categorical_values<S: Into<String>>(
        mut self,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categorical_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// The scale's config
    #[must_use]
    pub fn config(&self) -> &ColorScaleConfig {
        &self.config
    }

    /// Smallest numeric value
    #[must_use]
    pub fn min_possible_value(&self) -> Option<f64> {
        self.sorted_values.first().copied()
    }

    /// Largest numeric value
    #[must_use]
    pub fn max_possible_value(&self) -> Option<f64> {
        self.sorted_values.last().copied()
    }

    /// Upper bounds of the numeric bins
    #[must_use]
    pub fn bin_maximums(&self) -> Vec<f64> {
        bin_maximums(&self.sorted_values, &self.config)
    }

    /// Lower bound of the first numeric bin
    #[must_use]
    pub fn min_bin_value(&self) -> f64 {
        binning::min_bin_value(&self.sorted_values, &self.config)
    }

    /// Categorical values with the "No data" bucket appended when enabled
    #[must_use]
    pub fn categorical_legend_values(&self) -> Vec<String> {
        categorical_legend_values(&self.categorical_values, &self.options)
    }

    /// Scheme colors for every numeric and categorical bin
    #[must_use]
    pub fn base_colors(&self) -> Vec<String> {
        let count = self.bin_maximums().len() + self.categorical_legend_values().len();
        base_colors(&self.config, &self.options, count)
    }

    /// All bins: numeric first, then categorical
    #[must_use]
    pub fn bins(&self) -> Vec<ColorScaleBin> {
        compute_bins(
            &self.sorted_values,
            &self.categorical_values,
            &self.config,
            &self.options,
        )
    }

    /// Numeric bins only
    #[must_use]
    pub fn numeric_bins(&self) -> Vec<NumericBin> {
        self.bins()
            .into_iter()
            .filter_map(|bin| match bin {
                ColorScaleBin::Numeric(bin) => Some(bin),
                ColorScaleBin::Categorical(_) => None,
            })
            .collect()
    }

    /// Categorical bins only
    #[must_use]
    pub fn categorical_bins(&self) -> Vec<CategoricalBin> {
        self.bins()
            .into_iter()
            .filter_map(|bin| match bin {
                ColorScaleBin::Categorical(bin) => Some(bin),
                ColorScaleBin::Numeric(_) => None,
            })
            .collect()
    }

    /// Bins to draw in a legend (hidden categories left out)
    #[must_use]
    pub fn legend_bins(&self) -> Vec<ColorScaleBin> {
        self.bins().into_iter().filter(|bin| !bin.is_hidden()).collect()
    }

    /// Color for a value, or the no-data color for `None`
    #[must_use]
    pub fn get_color(&self, value: Option<&LegendValue>) -> Option<String> {
        get_color(&self.bins(), value, self.no_data_color())
    }

    /// The configured no-data color
    #[must_use]
    pub fn no_data_color(&self) -> &str {
        no_data_color(&self.config, &self.options)
    }
}

/// Compute the ordered legend bins for a dataset.
///
/// `values` need not be sorted; non-finite values are ignored.
#[must_use]
pub fn compute_bins(
    values: &[f64],
    categorical_values: &[String],
    config: &ColorScaleConfig,
    options: &ColorScaleOptions,
) -> Vec<ColorScaleBin> {
    let sorted = sorted_finite(values.iter().copied());
    let maximums = bin_maximums(&sorted, config);
    let categories = categorical_legend_values(categorical_values, options);
    let colors = base_colors(config, options, maximums.len() + categories.len());
    debug!(
        numeric = maximums.len(),
        categorical = categories.len(),
        strategy = ?config.binning_strategy,
        "computing color scale bins"
    );

    let mut bins = Vec::with_capacity(maximums.len() + categories.len());
    bins.extend(numeric_bins(&sorted, &maximums, &colors, config).map(ColorScaleBin::Numeric));
    bins.extend(
        categorical_bins(&categories, colors.get(maximums.len()..).unwrap_or(&[]), config, options)
            .map(ColorScaleBin::Categorical),
    );
    bins
}

/// Color of the first bin containing `value`.
///
/// `None` maps to `no_data_color`; a value no bin contains maps to `None`.
#[must_use]
pub fn get_color(
    bins: &[ColorScaleBin],
    value: Option<&LegendValue>,
    no_data_color: &str,
) -> Option<String> {
    let Some(value) = value else {
        return Some(no_data_color.to_string());
    };
    bins.iter()
        .find(|bin| bin.contains(value))
        .map(|bin| bin.color().to_string())
}

fn numeric_bins<'a>(
    sorted: &'a [f64],
    maximums: &'a [f64],
    colors: &'a [String],
    config: &'a ColorScaleConfig,
) -> impl Iterator<Item = NumericBin> + 'a {
    let min_bin = binning::min_bin_value(sorted, config);
    let data_min = sorted.first().copied().unwrap_or(min_bin);
    let data_max = sorted.last().copied().unwrap_or(min_bin);
    let last_index = maximums.len().saturating_sub(1);

    maximums.iter().enumerate().map(move |(index, &max)| {
        let min = if index == 0 { min_bin } else { maximums[index - 1] };
        let color = config
            .custom_numeric_color(index)
            .map(str::to_string)
            .or_else(|| colors.get(index).cloned())
            .unwrap_or_default();
        NumericBin {
            min,
            max,
            color,
            label: config.custom_numeric_label(index).map(str::to_string),
            is_open_left: index == 0 && min > data_min,
            is_open_right: index == last_index && max < data_max,
            is_first: index == 0,
        }
    })
}

fn categorical_bins<'a>(
    categories: &'a [String],
    colors: &'a [String],
    config: &'a ColorScaleConfig,
    options: &'a ColorScaleOptions,
) -> impl Iterator<Item = CategoricalBin> + 'a {
    categories.iter().enumerate().map(move |(index, value)| {
        let is_no_data = options.has_no_data_bin && *value == options.no_data_label;
        let custom_color = config.custom_category_colors.get(value).cloned();
        let color = if is_no_data {
            custom_color.unwrap_or_else(|| no_data_color(config, options).to_string())
        } else {
            custom_color
                .or_else(|| colors.get(index).cloned())
                .unwrap_or_default()
        };

        let label = match config.custom_category_labels.get(value) {
            Some(label) if !label.is_empty() => label.clone(),
            _ if is_no_data => options.no_data_label.clone(),
            _ => match &options.category_formatter {
                Some(format) => format(value.as_str()),
                None => value.clone(),
            },
        };

        CategoricalBin {
            value: value.clone(),
            color,
            label,
            is_hidden: config.is_category_hidden(value),
            index,
        }
    })
}

fn categorical_legend_values(values: &[String], options: &ColorScaleOptions) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut distinct: Vec<String> = values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect();
    if options.has_no_data_bin && !distinct.contains(&options.no_data_label) {
        distinct.push(options.no_data_label.clone());
    }
    distinct
}

fn base_colors(config: &ColorScaleConfig, options: &ColorScaleOptions, count: usize) -> Vec<String> {
    let scheme = ColorScheme::resolve(
        config.base_color_scheme.as_deref(),
        options.default_color_scheme.as_deref(),
    );
    let mut colors = scheme.get_colors(count);
    if config.color_scheme_invert {
        colors.reverse();
    }
    colors
}

fn no_data_color<'a>(config: &'a ColorScaleConfig, options: &'a ColorScaleOptions) -> &'a str {
    config
        .no_data_color
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(options.no_data_color.as_str())
}

fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}
