// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Merge command - apply a patch on top of its parent

use std::path::Path;

use anyhow::Result;

use super::{print_json, read_config};
use crate::defaults::grapher_defaults;
use crate::patch::{merge, resolve_effective};

/// Run the merge command.
///
/// With `with_defaults`, the built-in defaults are layered under the parent
/// and the parent's identity keys are not inherited.
pub fn run(parent: &Path, patch: &Path, with_defaults: bool) -> Result<()> {
    let parent = read_config(parent)?;
    let patch = read_config(patch)?;

    let merged = if with_defaults {
        resolve_effective(grapher_defaults(), &parent, &patch)
    } else {
        merge(&parent, &patch)
    };
    print_json(&merged)
}
