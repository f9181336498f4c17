// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bins command - compute the legend bins of a chart's color scale

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing::debug;

use super::{print_json, read_config};
use crate::color_scale::palette::parse_hex;
use crate::color_scale::{round_to_sig_fig, ColorScale, ColorScaleBin, ColorScaleConfig, LegendValue};
use crate::config::Settings;
use crate::schema::migrate_to_latest;
use crate::types::SCHEMA_KEY;

/// Arguments for the bins command
#[derive(Debug, Clone, Default)]
pub struct BinsArgs {
    /// Chart config holding the color scale
    pub chart: PathBuf,
    /// JSON array of numeric values
    pub values: Option<PathBuf>,
    /// Categorical values, in legend order
    pub categories: Vec<String>,
    /// Key path of the color scale inside the chart config
    pub path: String,
    /// Append a "No data" bucket
    pub no_data_bin: bool,
    /// Look up the color of this value instead of listing bins
    pub lookup: Option<String>,
    /// Print JSON
    pub json: bool,
    /// Colored output
    pub color: bool,
}

/// Run the bins command
pub fn run(settings: &Settings, args: &BinsArgs) -> Result<()> {
    let mut chart = read_config(&args.chart)?;
    if chart.contains_key(SCHEMA_KEY) {
        chart = migrate_to_latest(&chart)
            .with_context(|| format!("Failed to migrate {}", args.chart.display()))?;
    }

    let values = match &args.values {
        Some(path) => read_values(path)?,
        None => Vec::new(),
    };
    debug!("Loaded {} numeric values", values.len());

    let mut options = settings.color_scale_options();
    options.has_no_data_bin = args.no_data_bin;
    let scale = ColorScale::new(ColorScaleConfig::from_chart_config(&chart, &args.path), options)
        .with_numeric_values(values)
        .with_categorical_values(args.categories.iter().cloned());

    if let Some(raw) = &args.lookup {
        let value = parse_lookup(raw);
        let color = scale.get_color(value.as_ref());
        if args.json {
            return print_json(&color);
        }
        println!("{}", color.as_deref().unwrap_or("none"));
        return Ok(());
    }

    let bins = scale.bins();
    if args.json {
        return print_json(&bins);
    }
    print_legend(&bins, args.color)
}

/// Read a JSON array of numbers; nulls and non-numbers are skipped
fn read_values(path: &Path) -> Result<Vec<f64>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let values: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON array in {}", path.display()))?;
    Ok(values.iter().filter_map(Value::as_f64).collect())
}

fn parse_lookup(raw: &str) -> Option<LegendValue> {
    if raw.is_empty() {
        return None;
    }
    Some(match raw.parse::<f64>() {
        Ok(number) => LegendValue::Number(number),
        Err(_) => LegendValue::Text(raw.to_string()),
    })
}

fn print_legend(bins: &[ColorScaleBin], color: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if bins.is_empty() {
        writeln!(stdout, "No bins")?;
        return Ok(());
    }
    for bin in bins {
        let text = match bin {
            ColorScaleBin::Numeric(bin) => bin.text(|v| round_to_sig_fig(v, 6).to_string()),
            ColorScaleBin::Categorical(bin) if bin.is_hidden => format!("{} (hidden)", bin.label),
            ColorScaleBin::Categorical(bin) => bin.label.clone(),
        };
        let swatch = match parse_hex(bin.color()) {
            Some([r, g, b]) if color => "██".truecolor(r, g, b).to_string(),
            _ => "██".to_string(),
        };
        writeln!(stdout, "{swatch} {:<8} {text}", bin.color())?;
    }
    Ok(())
}
