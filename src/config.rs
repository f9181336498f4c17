// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `GRAPHER_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color_scale::{ColorScaleOptions, DEFAULT_COLOR_SCHEME};
use crate::narrative::{NARRATIVE_OMIT_KEYS, NARRATIVE_PERSIST_KEYS};
use crate::types::{DEFAULT_NO_DATA_COLOR, NO_DATA_LABEL};

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "GRAPHER";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Color scheme used when a config names none
    pub default_color_scheme: String,
    /// Color for values with no data
    pub no_data_color: String,
    /// Label of the "No data" legend bucket
    pub no_data_label: String,
    /// Keys stripped from configs before diffing
    pub omit_keys: Vec<String>,
    /// Keys written to patches regardless of the parent value
    pub persist_keys: Vec<String>,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            no_data_color: DEFAULT_NO_DATA_COLOR.to_string(),
            no_data_label: NO_DATA_LABEL.to_string(),
            omit_keys: NARRATIVE_OMIT_KEYS.iter().map(ToString::to_string).collect(),
            persist_keys: NARRATIVE_PERSIST_KEYS.iter().map(ToString::to_string).collect(),
            color: true,
        }
    }
}

impl Settings {
    /// Color-scale options derived from these settings
    #[must_use]
    pub fn color_scale_options(&self) -> ColorScaleOptions {
        ColorScaleOptions {
            default_color_scheme: Some(self.default_color_scheme.clone()),
            no_data_color: self.no_data_color.clone(),
            no_data_label: self.no_data_label.clone(),
            ..ColorScaleOptions::default()
        }
    }

    /// Look up a setting by name, rendered as a string
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        match value.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Default settings file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "ourworldindata", "grapher-config")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load settings from defaults, an optional file and the environment.
///
/// An explicitly given file must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let defaults = config::Config::try_from(&Settings::default())
        .context("Failed to build default settings")?;
    let mut builder = config::Config::builder().add_source(defaults);

    match path {
        Some(path) => {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("omit_keys")
                .with_list_parse_key("persist_keys"),
        )
        .build()
        .context("Failed to load settings")?;

    settings
        .try_deserialize()
        .context("Failed to parse settings")
}
