//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Cache busting for minified assets referenced from templates
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: minstamp.toml)
    #[arg(short = 'C', long, global = true, default_value = "minstamp.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Asset root override (relative to project root)
    #[arg(short = 'A', long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub asset_path: Option<String>,

    /// Log and skip references to missing assets instead of aborting
    #[arg(long, global = true)]
    pub skip_missing: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Capture, run hooks, then stamp changed assets and rewrite templates
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        targets: TargetArgs,

        /// Re-stamp every tracked asset, changed or not
        #[arg(short, long)]
        force: bool,
    },

    /// List the asset references found in each template
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Report references whose asset files are missing
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        targets: TargetArgs,
    },
}

/// Target selection shared by all subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Targets to process, in order. If omitted, processes all targets.
    #[arg(value_name = "TARGET")]
    pub names: Vec<String>,
}

#[allow(unused)]
impl Cli {
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run { .. })
    }
    pub const fn is_scan(&self) -> bool {
        matches!(self.command, Commands::Scan { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }
}
