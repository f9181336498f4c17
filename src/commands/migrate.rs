// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Migrate command - bring configs up to the latest schema version

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::Glob;
use serde_json::{Map, Value};
use tracing::{info, warn};
use walkdir::WalkDir;

use super::{print_json, read_config, write_json};
use crate::schema::{detect_version, migrate_to_latest, DetectedSchema, SchemaVersion};
use crate::types::GrapherConfig;

/// Arguments for the migrate command
#[derive(Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Config files to migrate
    pub files: Vec<PathBuf>,
    /// Directory to search for configs
    pub dir: Option<PathBuf>,
    /// File-name pattern used with `dir`
    pub glob: String,
    /// Rewrite files instead of printing
    pub in_place: bool,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Migrated from an older version
    Migrated(SchemaVersion),
    /// Already at the latest version
    UpToDate,
    /// Version not in the chain, left untouched
    Unrecognized(String),
}

/// Run the migrate command
pub fn run(args: &MigrateArgs) -> Result<()> {
    let files = collect_files(args)?;
    if files.is_empty() {
        bail!("No config files given. Pass files or --dir");
    }

    let mut printed = Map::new();
    let mut failures = 0;
    for path in &files {
        match migrate_file(path) {
            Ok((migrated, outcome)) => {
                report(path, &outcome);
                if args.in_place {
                    if matches!(outcome, Outcome::Migrated(_)) {
                        write_json(path, &migrated)?;
                    }
                } else {
                    printed.insert(path.display().to_string(), Value::Object(migrated));
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("Error: {}: {err:#}", path.display());
            }
        }
    }

    if !args.in_place {
        if printed.len() == 1 {
            if let Some((_, config)) = printed.into_iter().next() {
                print_json(&config)?;
            }
        } else {
            print_json(&printed)?;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} configs failed to migrate", files.len());
    }
    Ok(())
}

/// Migrate one file, returning the migrated config and what happened
pub fn migrate_file(path: &Path) -> Result<(GrapherConfig, Outcome)> {
    let config = read_config(path)?;
    let outcome = match detect_version(&config)? {
        DetectedSchema::Known(version) if version == SchemaVersion::LATEST => Outcome::UpToDate,
        DetectedSchema::Known(version) => Outcome::Migrated(version),
        DetectedSchema::Unrecognized(tag) => Outcome::Unrecognized(tag),
    };
    let migrated = migrate_to_latest(&config)
        .with_context(|| format!("Failed to migrate {}", path.display()))?;
    Ok((migrated, outcome))
}

fn report(path: &Path, outcome: &Outcome) {
    match outcome {
        Outcome::Migrated(from) => info!(
            "Migrated {}: {} -> {}",
            path.display(),
            from,
            SchemaVersion::LATEST
        ),
        Outcome::UpToDate => info!("{} is already at {}", path.display(), SchemaVersion::LATEST),
        Outcome::Unrecognized(tag) => {
            warn!("{}: unrecognized schema version {}, left unchanged", path.display(), tag);
        }
    }
}

fn collect_files(args: &MigrateArgs) -> Result<Vec<PathBuf>> {
    let mut files = args.files.clone();
    if let Some(dir) = &args.dir {
        let matcher = Glob::new(&args.glob)
            .with_context(|| format!("Invalid glob pattern: {}", args.glob))?
            .compile_matcher();
        let mut found: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| matcher.is_match(entry.file_name()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}
