// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! grapher-config CLI - migrate, diff, merge and bin chart configs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grapher_config::commands;
use grapher_config::commands::bins::BinsArgs;
use grapher_config::commands::diff::DiffArgs;
use grapher_config::commands::migrate::MigrateArgs;

#[derive(Parser)]
#[command(name = "grapher-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file path
    #[arg(short, long, env = "GRAPHER_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate configs to the latest schema version
    Migrate {
        /// Config files to migrate
        files: Vec<std::path::PathBuf>,

        /// Directory to search for configs
        #[arg(long)]
        dir: Option<std::path::PathBuf>,

        /// File-name pattern used with --dir
        #[arg(long, default_value = "*.json")]
        glob: String,

        /// Rewrite files instead of printing them
        #[arg(long)]
        in_place: bool,
    },

    /// Compute the patch between a config and its parent
    Diff {
        /// Full config
        #[arg(long)]
        full: std::path::PathBuf,

        /// Parent config
        #[arg(long)]
        parent: std::path::PathBuf,

        /// Extra key paths to omit (repeatable)
        #[arg(long)]
        omit: Vec<String>,

        /// Extra key paths to always persist (repeatable)
        #[arg(long)]
        persist: Vec<String>,

        /// Ignore omit/persist keys from settings
        #[arg(long)]
        no_default_keys: bool,
    },

    /// Apply a patch on top of its parent
    Merge {
        /// Parent config
        #[arg(long)]
        parent: std::path::PathBuf,

        /// Patch to apply
        #[arg(long)]
        patch: std::path::PathBuf,

        /// Layer the built-in defaults under the parent
        #[arg(long)]
        defaults: bool,
    },

    /// Compute color-scale legend bins
    Bins {
        /// Chart config holding the color scale
        #[arg(long)]
        chart: std::path::PathBuf,

        /// JSON array of numeric values
        #[arg(long)]
        values: Option<std::path::PathBuf>,

        /// Categorical values, comma separated
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,

        /// Key path of the color scale
        #[arg(long, default_value = "map.colorScale")]
        path: String,

        /// Append a "No data" bucket
        #[arg(long)]
        no_data_bin: bool,

        /// Print the color of this value instead of the bins
        #[arg(long)]
        lookup: Option<String>,
    },

    /// Show settings
    Config {
        /// Setting name (omit to show all)
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = grapher_config::config::load(cli.config.as_deref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => settings.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color = settings.color && !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Migrate { files, dir, glob, in_place } => {
            commands::migrate::run(&MigrateArgs { files, dir, glob, in_place })
        }
        Commands::Diff { full, parent, omit, persist, no_default_keys } => {
            commands::diff::run(&settings, &DiffArgs { full, parent, omit, persist, no_default_keys })
        }
        Commands::Merge { parent, patch, defaults } => {
            commands::merge::run(&parent, &patch, defaults)
        }
        Commands::Bins { chart, values, categories, path, no_data_bin, lookup } => {
            let args = BinsArgs {
                chart,
                values,
                categories,
                path,
                no_data_bin,
                lookup,
                json: cli.json,
                color,
            };
            commands::bins::run(&settings, &args)
        }
        Commands::Config { key } => {
            commands::config::run(&settings, key.as_deref())
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
