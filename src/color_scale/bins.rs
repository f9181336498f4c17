// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Legend bins

use serde::{Deserialize, Serialize};

/// A value looked up against a color scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendValue {
    /// Numeric value, matched against numeric bins
    Number(f64),
    /// Categorical value, matched against categorical bins
    Text(String),
}

impl From<f64> for LegendValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LegendValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LegendValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A numeric interval of the legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericBin {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
    /// Display color
    pub color: String,
    /// Custom label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Data extends below `min` (rendered as "≤ max")
    pub is_open_left: bool,
    /// Data extends above `max` (rendered as "≥ min")
    pub is_open_right: bool,
    /// First numeric bin, which also includes its lower bound
    pub is_first: bool,
}

impl NumericBin {
    /// Whether `value` falls in this bin.
    ///
    /// Bins are `(min, max]`, except the first which is `[min, max]`.
    /// Open sides extend to infinity.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        if self.is_open_left && value <= self.max {
            return true;
        }
        if self.is_open_right && value > self.min {
            return true;
        }
        let above_min = if self.is_first { value >= self.min } else { value > self.min };
        above_min && value <= self.max
    }

    /// Legend text, using `format` for the bounds
    pub fn text(&self, format: impl Fn(f64) -> String) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match (self.is_open_left, self.is_open_right) {
            (true, false) => format!("≤ {}", format(self.max)),
            (false, true) => format!("≥ {}", format(self.min)),
            _ => format!("{} – {}", format(self.min), format(self.max)),
        }
    }
}

/// One categorical bucket of the legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalBin {
    /// Category value
    pub value: String,
    /// Display color
    pub color: String,
    /// Display label
    pub label: String,
    /// Hidden in the legend, but still allocated
    pub is_hidden: bool,
    /// Position among the categorical bins
    pub index: usize,
}

impl CategoricalBin {
    /// Whether `value` is this bin's category
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.value == value
    }
}

/// A legend bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColorScaleBin {
    /// Numeric interval
    Numeric(NumericBin),
    /// Categorical bucket
    Categorical(CategoricalBin),
}

impl ColorScaleBin {
    /// Display color
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Numeric(bin) => &bin.color,
            Self::Categorical(bin) => &bin.color,
        }
    }

    /// Whether `value` falls in this bin
    #[must_use]
    pub fn contains(&self, value: &LegendValue) -> bool {
        match (self, value) {
            (Self::Numeric(bin), LegendValue::Number(v)) => bin.contains(*v),
            (Self::Categorical(bin), LegendValue::Text(v)) => bin.contains(v),
            _ => false,
        }
    }

    /// Whether this bin is hidden from the legend
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Categorical(bin) if bin.is_hidden)
    }

    /// The numeric bin, if this is one
    #[must_use]
    pub fn as_numeric(&self) -> Option<&NumericBin> {
        match self {
            Self::Numeric(bin) => Some(bin),
            Self::Categorical(_) => None,
        }
    }

    /// The categorical bin, if this is one
    #[must_use]
    pub fn as_categorical(&self) -> Option<&CategoricalBin> {
        match self {
            Self::Categorical(bin) => Some(bin),
            Self::Numeric(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(min: f64, max: f64) -> NumericBin {
        NumericBin {
            min,
            max,
            color: "#000000".into(),
            label: None,
            is_open_left: false,
            is_open_right: false,
            is_first: false,
        }
    }

    #[test]
    fn test_interior_bin_excludes_its_minimum() {
        let b = bin(10.0, 20.0);
        assert!(!b.contains(10.0));
        assert!(b.contains(10.5));
        assert!(b.contains(20.0));
        assert!(!b.contains(f64::NAN));

        let first = NumericBin { is_first: true, ..bin(10.0, 20.0) };
        assert!(first.contains(10.0));
    }

    #[test]
    fn test_open_sides_extend_to_infinity() {
        let left = NumericBin { is_open_left: true, ..bin(10.0, 20.0) };
        assert!(left.contains(-1e9));
        assert_eq!(left.text(|v| v.to_string()), "≤ 20");

        let right = NumericBin { is_open_right: true, ..bin(10.0, 20.0) };
        assert!(right.contains(1e9));
        assert!(!right.contains(10.0));
    }

    #[test]
    fn test_legend_value_deserializes_untagged() {
        let values: Vec<LegendValue> = serde_json::from_str(r#"[1.5, "Asia"]"#).unwrap();
        assert_eq!(values, vec![LegendValue::Number(1.5), LegendValue::from("Asia")]);
    }
}
