// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Schema versions and the migration chain
//!
//! Every config carries a `$schema` URL of the form
//! `https://files.ourworldindata.org/schemas/grapher-schema.NNN.json`.
//! Versions form a single linear chain; each non-terminal version owns
//! exactly one migration to its successor. Migrations are pure record
//! transforms over a cloned config.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::path;
use crate::types::{GrapherConfig, SCHEMA_KEY};

/// URL prefix shared by every schema version
pub const SCHEMA_URL_PREFIX: &str = "https://files.ourworldindata.org/schemas/grapher-schema.";

/// Upper bound for `map.colorScale.binningStrategyBinCount`
pub const MAX_BIN_COUNT: u64 = 20;

/// Bin count used when a config has none (or an unusable one)
pub const DEFAULT_BIN_COUNT: u64 = 5;

static SCHEMA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://files\.ourworldindata\.org/schemas/grapher-schema\.(\d{3})\.json$")
        .expect("schema pattern is a valid regex")
});

/// Known schema versions, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// grapher-schema.001
    V001,
    /// grapher-schema.002
    V002,
    /// grapher-schema.003
    V003,
    /// grapher-schema.004
    V004,
    /// grapher-schema.005
    V005,
    /// grapher-schema.006
    V006,
    /// grapher-schema.007
    V007,
    /// grapher-schema.008
    V008,
}

impl SchemaVersion {
    /// The terminal version every migration ends at
    pub const LATEST: Self = Self::V008;

    /// All versions in chain order
    pub const ALL: [Self; 8] = [
        Self::V001,
        Self::V002,
        Self::V003,
        Self::V004,
        Self::V005,
        Self::V006,
        Self::V007,
        Self::V008,
    ];

    /// Three-digit version tag
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::V001 => "001",
            Self::V002 => "002",
            Self::V003 => "003",
            Self::V004 => "004",
            Self::V005 => "005",
            Self::V006 => "006",
            Self::V007 => "007",
            Self::V008 => "008",
        }
    }

    /// Parse a three-digit version tag
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.tag() == tag)
    }

    /// The version this one migrates to, `None` at the terminal version
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::V001 => Some(Self::V002),
            Self::V002 => Some(Self::V003),
            Self::V003 => Some(Self::V004),
            Self::V004 => Some(Self::V005),
            Self::V005 => Some(Self::V006),
            Self::V006 => Some(Self::V007),
            Self::V007 => Some(Self::V008),
            Self::V008 => None,
        }
    }

    /// The `$schema` URL for this version
    #[must_use]
    pub fn url(self) -> String {
        schema_url(self)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Outcome of reading a config's `$schema`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedSchema {
    /// A version in the migration chain
    Known(SchemaVersion),
    /// Well-formed URL whose three-digit tag is not a known version
    Unrecognized(String),
}

/// Build the `$schema` URL for a version
#[must_use]
pub fn schema_url(version: SchemaVersion) -> String {
    format!("{SCHEMA_URL_PREFIX}{}.json", version.tag())
}

/// The latest `$schema` URL
#[must_use]
pub fn latest_schema_url() -> String {
    schema_url(SchemaVersion::LATEST)
}

/// Identify the schema version of a config
pub fn detect_version(config: &GrapherConfig) -> Result<DetectedSchema, SchemaError> {
    let schema = config
        .get(SCHEMA_KEY)
        .and_then(Value::as_str)
        .ok_or(SchemaError::SchemaMissing)?;
    let captures = SCHEMA_PATTERN
        .captures(schema)
        .ok_or_else(|| SchemaError::InvalidSchema(schema.to_string()))?;
    let tag = &captures[1];
    Ok(match SchemaVersion::parse_tag(tag) {
        Some(version) => DetectedSchema::Known(version),
        None => DetectedSchema::Unrecognized(tag.to_string()),
    })
}

/// Whether a config is already at the latest version
#[must_use]
pub fn is_latest(config: &GrapherConfig) -> bool {
    matches!(
        detect_version(config),
        Ok(DetectedSchema::Known(SchemaVersion::LATEST))
    )
}

/// Migrate a config to the latest schema version.
///
/// The input is never modified. A config whose URL is well formed but whose
/// version is unknown is returned unchanged with a warning; a missing or
/// malformed `$schema` is an error.
pub fn migrate_to_latest(config: &GrapherConfig) -> Result<GrapherConfig, SchemaError> {
    let version = match detect_version(config)? {
        DetectedSchema::Known(version) => version,
        DetectedSchema::Unrecognized(tag) => {
            warn!(version = %tag, "Unrecognized schema version, config left unmigrated");
            return Ok(config.clone());
        }
    };

    run_chain(config, version, migrate_step)
}

/// Drive `step` from `version` until the terminal version, checking that
/// every step advances the `$schema`
fn run_chain<F>(
    config: &GrapherConfig,
    mut version: SchemaVersion,
    step: F,
) -> Result<GrapherConfig, SchemaError>
where
    F: Fn(SchemaVersion, GrapherConfig) -> GrapherConfig,
{
    let mut migrated = config.clone();
    let mut steps = 0;
    while let Some(target) = version.next() {
        if steps >= SchemaVersion::ALL.len() {
            return Err(SchemaError::MigrationDidNotTerminate {
                version: version.tag().to_string(),
                steps,
            });
        }
        debug!(from = %version, to = %target, "Applying schema migration");
        migrated = step(version, migrated);
        steps += 1;

        let reached = match detect_version(&migrated)? {
            DetectedSchema::Known(reached) => reached,
            DetectedSchema::Unrecognized(tag) => {
                return Err(SchemaError::MigrationDidNotTerminate { version: tag, steps })
            }
        };
        if reached <= version {
            return Err(SchemaError::MigrationDidNotTerminate {
                version: reached.tag().to_string(),
                steps,
            });
        }
        version = reached;
    }
    Ok(migrated)
}

/// Apply the single migration owned by `from`
fn migrate_step(from: SchemaVersion, config: GrapherConfig) -> GrapherConfig {
    let (mut config, to) = match from {
        SchemaVersion::V001 => (drop_auto_flags(config), SchemaVersion::V002),
        SchemaVersion::V002 => (rename_map_target_year(config), SchemaVersion::V003),
        SchemaVersion::V003 => (drop_data_block(config), SchemaVersion::V004),
        SchemaVersion::V004 => (drop_tolerance_flag(config), SchemaVersion::V005),
        SchemaVersion::V005 => (chart_type_to_chart_types(config), SchemaVersion::V006),
        SchemaVersion::V006 => (nest_base_color_scheme(config), SchemaVersion::V007),
        SchemaVersion::V007 => (restructure_map_color_scale(config), SchemaVersion::V008),
        SchemaVersion::V008 => return config,
    };
    config.insert(SCHEMA_KEY.to_string(), Value::String(schema_url(to)));
    config
}

// 001 -> 002
fn drop_auto_flags(mut config: GrapherConfig) -> GrapherConfig {
    config.remove("isAutoTitle");
    config.remove("isAutoSlug");
    config
}

// 002 -> 003
fn rename_map_target_year(mut config: GrapherConfig) -> GrapherConfig {
    if let Some(map) = path::get_object_mut(&mut config, "map") {
        if let Some(year) = map.remove("targetYear") {
            map.insert("time".to_string(), year);
        }
    }
    config
}

// 003 -> 004
fn drop_data_block(mut config: GrapherConfig) -> GrapherConfig {
    config.remove("data");
    config
}

// 004 -> 005
fn drop_tolerance_flag(mut config: GrapherConfig) -> GrapherConfig {
    config.remove("hideLinesOutsideTolerance");
    config
}

// 005 -> 006
fn chart_type_to_chart_types(mut config: GrapherConfig) -> GrapherConfig {
    let chart_type = config.remove("type");
    let has_chart_tab = config
        .remove("hasChartTab")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let chart_types = if has_chart_tab {
        let chart_type = chart_type
            .filter(Value::is_string)
            .unwrap_or_else(|| json!("LineChart"));
        vec![chart_type]
    } else {
        Vec::new()
    };
    config.insert("chartTypes".to_string(), Value::Array(chart_types));
    config
}

// 006 -> 007
fn nest_base_color_scheme(mut config: GrapherConfig) -> GrapherConfig {
    let Some(scheme) = config.remove("baseColorScheme") else {
        return config;
    };
    if path::get(&config, "colorScale.baseColorScheme").is_none() {
        path::set(&mut config, "colorScale.baseColorScheme", scheme);
    }
    config
}

// 007 -> 008
fn restructure_map_color_scale(mut config: GrapherConfig) -> GrapherConfig {
    let Some(scale) = path::get_object_mut(&mut config, "map.colorScale") else {
        return config;
    };

    if let Some(active) = scale.remove("customColorsActive") {
        scale
            .entry("customNumericColorsActive")
            .or_insert(active);
    }

    if let Some(manual) = scale.remove("isManualBuckets") {
        if manual.as_bool() == Some(true) {
            scale.insert("binningStrategy".to_string(), json!("manual"));
        }
    }

    if let Some(count) = scale.get("binningStrategyBinCount") {
        let clamped = clamp_bin_count(count);
        scale.insert("binningStrategyBinCount".to_string(), json!(clamped));
    }

    config
}

fn clamp_bin_count(count: &Value) -> u64 {
    match count.as_f64() {
        Some(n) if n.is_finite() => {
            // Saturating float-to-int cast, then clamp into range
            let rounded = n.round().max(0.0) as u64;
            rounded.clamp(1, MAX_BIN_COUNT)
        }
        _ => DEFAULT_BIN_COUNT,
    }
}

/// Strip the `$schema` field, e.g. before persisting a patch elsewhere
#[must_use]
pub fn without_schema(config: &GrapherConfig) -> GrapherConfig {
    let mut stripped: Map<String, Value> = config.clone();
    stripped.remove(SCHEMA_KEY);
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_linear_and_ends_at_latest() {
        let mut version = SchemaVersion::V001;
        let mut seen = 1;
        while let Some(next) = version.next() {
            assert!(next > version);
            version = next;
            seen += 1;
        }
        assert_eq!(version, SchemaVersion::LATEST);
        assert_eq!(seen, SchemaVersion::ALL.len());
    }

    #[test]
    fn test_clamp_bin_count() {
        assert_eq!(clamp_bin_count(&json!(0)), 1);
        assert_eq!(clamp_bin_count(&json!(7)), 7);
        assert_eq!(clamp_bin_count(&json!(250)), MAX_BIN_COUNT);
        assert_eq!(clamp_bin_count(&json!("nine")), DEFAULT_BIN_COUNT);
        assert_eq!(clamp_bin_count(&json!(-3)), 1);
    }

    #[test]
    fn test_stalled_step_is_reported() {
        let mut config = GrapherConfig::new();
        config.insert(SCHEMA_KEY.to_string(), json!(schema_url(SchemaVersion::V003)));

        let result = run_chain(&config, SchemaVersion::V003, |_, config| config);
        assert_eq!(
            result,
            Err(SchemaError::MigrationDidNotTerminate {
                version: "003".to_string(),
                steps: 1,
            })
        );
    }

    #[test]
    fn test_step_to_unknown_version_is_reported() {
        let mut config = GrapherConfig::new();
        config.insert(SCHEMA_KEY.to_string(), json!(schema_url(SchemaVersion::V007)));

        let result = run_chain(&config, SchemaVersion::V007, |_, mut config| {
            config.insert(SCHEMA_KEY.to_string(), json!(format!("{SCHEMA_URL_PREFIX}099.json")));
            config
        });
        assert_eq!(
            result,
            Err(SchemaError::MigrationDidNotTerminate {
                version: "099".to_string(),
                steps: 1,
            })
        );
    }

    #[test]
    fn test_run_chain_with_real_steps_reaches_latest() {
        let mut config = GrapherConfig::new();
        config.insert(SCHEMA_KEY.to_string(), json!(schema_url(SchemaVersion::V001)));
        let migrated = run_chain(&config, SchemaVersion::V001, migrate_step);
        assert!(migrated.as_ref().is_ok_and(is_latest));
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(SchemaVersion::parse_tag("004"), Some(SchemaVersion::V004));
        assert_eq!(SchemaVersion::parse_tag("4"), None);
        assert_eq!(SchemaVersion::parse_tag("009"), None);
    }
}
