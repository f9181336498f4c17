// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod bins;
pub mod completions;
pub mod config;
pub mod diff;
pub mod merge;
pub mod migrate;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::{parse_config, GrapherConfig};

/// Read and parse a JSON config file
pub fn read_config(path: &Path) -> Result<GrapherConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a value to stdout as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Write a value to a file as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    content.push('\n');
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
