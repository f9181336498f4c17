// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bin boundary computation for numeric color scales

use tracing::{trace, warn};

use super::config::{BinningStrategy, ColorScaleConfig};
use crate::schema::MAX_BIN_COUNT;

/// Bin count used by the automatic strategies when none is configured
pub const DEFAULT_BIN_COUNT: usize = 5;

/// Largest configured bin count honored; larger counts are capped
#[allow(clippy::cast_possible_truncation)]
pub const MAX_CONFIGURED_BINS: usize = MAX_BIN_COUNT as usize;

/// Step size used when there is nothing to compute one from
pub const DEFAULT_STEP_SIZE: f64 = 10.0;

/// How many standard deviations from the mean a value may sit before it is
/// ignored for step-size purposes
const OUTLIER_DEVIATIONS: f64 = 2.0;

/// Round to `figures` significant figures
#[must_use]
pub fn round_to_sig_fig(value: f64, figures: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    // log10 of a finite non-zero f64 lies well inside i32
    #[allow(clippy::cast_possible_truncation)]
    let magnitude = value.abs().log10().floor() as i32;
    let exponent = figures - 1 - magnitude;
    if exponent >= 0 {
        let factor = 10f64.powi(exponent);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-exponent);
        (value / factor).round() * factor
    }
}

/// Values within two population standard deviations of the mean
#[must_use]
pub fn trim_outliers(sorted: &[f64]) -> Vec<f64> {
    if sorted.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / count;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let limit = OUTLIER_DEVIATIONS * variance.sqrt();

    let trimmed: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() <= limit)
        .collect();
    if trimmed.is_empty() {
        sorted.to_vec()
    } else {
        trimmed
    }
}

/// Lower bound of the first bin.
///
/// Automatic scales include zero unless the data floor is positive.
#[must_use]
pub fn min_bin_value(sorted: &[f64], config: &ColorScaleConfig) -> f64 {
    if let Some(min) = config.custom_numeric_min_value {
        return min;
    }
    let trimmed = trim_outliers(sorted);
    let first = trimmed.first().copied().unwrap_or(0.0);
    round_to_sig_fig(first.min(0.0), 1).min(0.0)
}

/// Number of numeric bins the config asks for.
///
/// A configured count is clamped into `1..=MAX_CONFIGURED_BINS`; without one,
/// manual scales get one bin per boundary.
#[must_use]
pub fn bin_count(config: &ColorScaleConfig) -> usize {
    match config.binning_strategy_bin_count {
        Some(count) => {
            let clamped = count.clamp(1, MAX_CONFIGURED_BINS);
            if clamped != count {
                warn!(requested = count, used = clamped, "bin count out of range, clamping");
            }
            clamped
        }
        None => match config.binning_strategy {
            BinningStrategy::Manual => config.custom_numeric_values.len(),
            _ => DEFAULT_BIN_COUNT,
        },
    }
}

/// Equal-interval step size derived from the trimmed data range
#[must_use]
pub fn step_size(sorted: &[f64], min_bin: f64, bins: usize) -> f64 {
    let trimmed = trim_outliers(sorted);
    let Some(last) = trimmed.last() else {
        return DEFAULT_STEP_SIZE;
    };
    if bins == 0 {
        return DEFAULT_STEP_SIZE;
    }
    #[allow(clippy::cast_precision_loss)]
    let step = round_to_sig_fig((last - min_bin) / bins as f64, 1);
    if step.is_finite() && step > 0.0 {
        step
    } else {
        DEFAULT_STEP_SIZE
    }
}

/// Upper bounds of each numeric bin, in ascending order.
///
/// Empty input yields no bins, whatever the strategy.
#[must_use]
pub fn bin_maximums(sorted: &[f64], config: &ColorScaleConfig) -> Vec<f64> {
    if sorted.is_empty() {
        return Vec::new();
    }
    let bins = bin_count(config);
    if bins == 0 {
        return Vec::new();
    }
    let min_bin = min_bin_value(sorted, config);

    let maximums = match config.binning_strategy {
        BinningStrategy::Manual => manual_maximums(&config.custom_numeric_values, bins),
        BinningStrategy::EqualInterval => equal_interval_maximums(sorted, min_bin, bins),
        BinningStrategy::Quantiles => quantile_maximums(sorted, min_bin, bins),
        BinningStrategy::Ckmeans => ckmeans_maximums(sorted, min_bin, bins),
    };
    trace!(strategy = ?config.binning_strategy, min_bin, ?maximums, "computed bin maximums");
    maximums
}

fn manual_maximums(values: &[f64], bins: usize) -> Vec<f64> {
    let mut maximums: Vec<f64> = values.iter().copied().take(bins).collect();
    maximums.resize(bins, 0.0);
    maximums
}

fn equal_interval_maximums(sorted: &[f64], min_bin: f64, bins: usize) -> Vec<f64> {
    let step = step_size(sorted, min_bin, bins);
    #[allow(clippy::cast_precision_loss)]
    let maximums = (1..=bins).map(|i| min_bin + step * i as f64).collect();
    maximums
}

fn quantile_maximums(sorted: &[f64], min_bin: f64, bins: usize) -> Vec<f64> {
    let above: Vec<f64> = sorted.iter().copied().filter(|v| *v > min_bin).collect();
    if above.is_empty() {
        return equal_interval_maximums(sorted, min_bin, bins);
    }
    #[allow(clippy::cast_precision_loss)]
    let raw = (1..=bins).map(|i| quantile(&above, i as f64 / bins as f64));
    non_decreasing(raw.map(|q| round_to_sig_fig(q, 2)), min_bin)
}

fn ckmeans_maximums(sorted: &[f64], min_bin: f64, bins: usize) -> Vec<f64> {
    let clusters = ckmeans(sorted, bins);
    if clusters.is_empty() {
        return equal_interval_maximums(sorted, min_bin, bins);
    }
    let raw = clusters
        .iter()
        .filter_map(|cluster| cluster.last().copied());
    non_decreasing(raw.map(|max| round_to_sig_fig(max, 2)), min_bin)
}

fn non_decreasing(values: impl Iterator<Item = f64>, floor: f64) -> Vec<f64> {
    let mut previous = floor;
    values
        .map(|v| {
            previous = previous.max(v);
            previous
        })
        .collect()
}

/// Linearly interpolated quantile of sorted data, `p` in `[0, 1]`
#[must_use]
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            #[allow(clippy::cast_precision_loss)]
            let position = (len - 1) as f64 * p.clamp(0.0, 1.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lower = position.floor() as usize;
            let upper = (lower + 1).min(len - 1);
            #[allow(clippy::cast_precision_loss)]
            let fraction = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

/// Optimal 1-D k-means clustering of sorted data (Ckmeans.1d.dp).
///
/// `k` is clamped to the number of distinct values, so every cluster is
/// non-empty. Clusters come back in ascending order.
#[must_use]
pub fn ckmeans(sorted: &[f64], k: usize) -> Vec<Vec<f64>> {
    let n = sorted.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    let mut distinct = sorted.to_vec();
    distinct.dedup();
    let k = k.min(distinct.len());
    if k == 1 {
        return vec![sorted.to_vec()];
    }

    // Prefix sums over values shifted by the median, for numeric stability
    let shift = sorted[n / 2];
    let mut sum = vec![0.0; n + 1];
    let mut sum_sq = vec![0.0; n + 1];
    for (i, value) in sorted.iter().enumerate() {
        let shifted = value - shift;
        sum[i + 1] = sum[i] + shifted;
        sum_sq[i + 1] = sum_sq[i] + shifted * shifted;
    }
    // Within-cluster sum of squares of sorted[j..=i]
    let ssq = |j: usize, i: usize| -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let size = (i - j + 1) as f64;
        let s = sum[i + 1] - sum[j];
        (sum_sq[i + 1] - sum_sq[j] - s * s / size).max(0.0)
    };

    let mut cost = vec![vec![0.0; n]; k];
    let mut backtrack = vec![vec![0usize; n]; k];
    for i in 0..n {
        cost[0][i] = ssq(0, i);
    }
    for cluster in 1..k {
        for i in cluster..n {
            let mut best = f64::INFINITY;
            let mut best_start = cluster;
            for start in cluster..=i {
                let candidate = cost[cluster - 1][start - 1] + ssq(start, i);
                if candidate < best {
                    best = candidate;
                    best_start = start;
                }
            }
            cost[cluster][i] = best;
            backtrack[cluster][i] = best_start;
        }
    }

    let mut clusters = Vec::with_capacity(k);
    let mut right = n - 1;
    for cluster in (0..k).rev() {
        let left = backtrack[cluster][right];
        clusters.push(sorted[left..=right].to_vec());
        if left == 0 {
            break;
        }
        right = left - 1;
    }
    clusters.reverse();
    clusters
}
