// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Diff command - compute the patch between a config and its parent

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use super::{print_json, read_config};
use crate::config::Settings;
use crate::defaults::grapher_defaults;
use crate::patch::{diff_with_options, DiffOptions};

/// Arguments for the diff command
#[derive(Debug, Clone, Default)]
pub struct DiffArgs {
    /// Full config
    pub full: PathBuf,
    /// Parent config
    pub parent: PathBuf,
    /// Extra keys to omit
    pub omit: Vec<String>,
    /// Extra keys to persist
    pub persist: Vec<String>,
    /// Ignore the omit/persist keys from settings
    pub no_default_keys: bool,
}

/// Run the diff command
pub fn run(settings: &Settings, args: &DiffArgs) -> Result<()> {
    let full = read_config(&args.full)?;
    let parent = read_config(&args.parent)?;

    let mut options = if args.no_default_keys {
        DiffOptions::default()
    } else {
        DiffOptions::omitting(&settings.omit_keys).persisting(&settings.persist_keys)
    };
    options = options
        .with_defaults(grapher_defaults())
        .persisting(&args.persist);
    options.omit_keys.extend(args.omit.iter().cloned());

    let patch = diff_with_options(&full, &parent, &options);
    info!("Patch has {} top-level keys", patch.len());
    print_json(&patch)
}
