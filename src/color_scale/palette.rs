// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Named color schemes
//!
//! Sequential schemes are ColorBrewer 9-class ramps, interpolated in RGB to
//! any requested size. Qualitative schemes repeat once exhausted.

use tracing::warn;

/// Scheme used when a config names none, or names an unknown one
pub const DEFAULT_COLOR_SCHEME: &str = "BuGn";

/// Whether a scheme encodes order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// Light-to-dark ramp for ordered data
    Sequential,
    /// Distinct hues for nominal data
    Qualitative,
}

/// A named, ordered palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// Identifier configs refer to
    pub name: &'static str,
    /// Sequential or qualitative
    pub kind: SchemeKind,
    /// Anchor colors as `#rrggbb`
    pub colors: &'static [&'static str],
}

const SCHEMES: [ColorScheme; 6] = [
    ColorScheme {
        name: "BuGn",
        kind: SchemeKind::Sequential,
        colors: &[
            "#f7fcfd", "#e5f5f9", "#ccece6", "#99d8c9", "#66c2a4", "#41ae76", "#238b45", "#006d2c",
            "#00441b",
        ],
    },
    ColorScheme {
        name: "YlGnBu",
        kind: SchemeKind::Sequential,
        colors: &[
            "#ffffd9", "#edf8b1", "#c7e9b4", "#7fcdbb", "#41b6c4", "#1d91c0", "#225ea8", "#253494",
            "#081d58",
        ],
    },
    ColorScheme {
        name: "Reds",
        kind: SchemeKind::Sequential,
        colors: &[
            "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
            "#67000d",
        ],
    },
    ColorScheme {
        name: "Blues",
        kind: SchemeKind::Sequential,
        colors: &[
            "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
            "#08306b",
        ],
    },
    ColorScheme {
        name: "Greys",
        kind: SchemeKind::Sequential,
        colors: &[
            "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525",
            "#000000",
        ],
    },
    ColorScheme {
        name: "OwidDistinctLines",
        kind: SchemeKind::Qualitative,
        colors: &[
            "#6d3e91", "#c05917", "#58ac8c", "#286bbb", "#883039", "#bc8e5a", "#00295b", "#c15065",
            "#18470f", "#9a5129", "#e56e5a", "#a2559c", "#38aaba", "#578145", "#970046", "#00847e",
        ],
    },
];

impl ColorScheme {
    /// Look up a scheme by name
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        SCHEMES.iter().find(|s| s.name == name)
    }

    /// Look up a scheme, falling back to `fallback` and then to
    /// [`DEFAULT_COLOR_SCHEME`]
    #[must_use]
    pub fn resolve(name: Option<&str>, fallback: Option<&str>) -> &'static Self {
        if let Some(name) = name {
            if let Some(scheme) = Self::find(name) {
                return scheme;
            }
            let known: Vec<&str> = Self::names().collect();
            warn!(scheme = name, ?known, "Unknown color scheme, using default");
        }
        fallback
            .and_then(Self::find)
            .or_else(|| Self::find(DEFAULT_COLOR_SCHEME))
            .unwrap_or(&SCHEMES[0])
    }

    /// Names of all known schemes
    pub fn names() -> impl Iterator<Item = &'static str> {
        SCHEMES.iter().map(|s| s.name)
    }

    /// Exactly `count` colors from this scheme
    #[must_use]
    pub fn get_colors(&self, count: usize) -> Vec<String> {
        if count == 0 || self.colors.is_empty() {
            return Vec::new();
        }
        match self.kind {
            SchemeKind::Qualitative => self
                .colors
                .iter()
                .cycle()
                .take(count)
                .map(|c| (*c).to_string())
                .collect(),
            SchemeKind::Sequential if count == 1 => vec![self.interpolate(0.5)],
            SchemeKind::Sequential => {
                #[allow(clippy::cast_precision_loss)]
                let last = (count - 1) as f64;
                #[allow(clippy::cast_precision_loss)]
                let colors = (0..count).map(|i| self.interpolate(i as f64 / last)).collect();
                colors
            }
        }
    }

    /// Color at position `t` in `[0, 1]` along the ramp
    #[must_use]
    pub fn interpolate(&self, t: f64) -> String {
        let anchors: Vec<[u8; 3]> = self.colors.iter().filter_map(|c| parse_hex(c)).collect();
        match anchors.len() {
            0 => return DEFAULT_FALLBACK_COLOR.to_string(),
            1 => return format_hex(anchors[0]),
            _ => {}
        }
        #[allow(clippy::cast_precision_loss)]
        let position = t.clamp(0.0, 1.0) * (anchors.len() - 1) as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lower = (position.floor() as usize).min(anchors.len() - 2);
        #[allow(clippy::cast_precision_loss)]
        let fraction = position - lower as f64;
        let (a, b) = (anchors[lower], anchors[lower + 1]);
        let mix = |x: u8, y: u8| -> u8 {
            let value = f64::from(x) + (f64::from(y) - f64::from(x)) * fraction;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let channel = value.round().clamp(0.0, 255.0) as u8;
            channel
        };
        format_hex([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
    }
}

const DEFAULT_FALLBACK_COLOR: &str = "#808080";

/// Parse `#rrggbb` (or `#rgb`) into RGB channels
#[must_use]
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            let channel = |i: usize| {
                let digit = u8::from_str_radix(hex.get(i..=i)?, 16).ok()?;
                Some(digit * 17)
            };
            Some([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => None,
    }
}

/// Format RGB channels as `#rrggbb`
#[must_use]
pub fn format_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
