// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - show the effective settings

use anyhow::{bail, Result};

use super::print_json;
use crate::config::Settings;

/// Show one setting, or all of them
pub fn run(settings: &Settings, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => match settings.get(key) {
            Some(value) => {
                tracing::debug!("Getting {}", key);
                println!("{value}");
                Ok(())
            }
            None => bail!("Unknown setting: {}", key),
        },
        None => print_json(settings),
    }
}
