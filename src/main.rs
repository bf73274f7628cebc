//! minstamp - cache busting for minified assets referenced from templates.

mod asset;
mod cli;
mod config;
mod fs;
mod hooks;
mod logger;
mod session;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::StampConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = StampConfig::load(&cli)?;

    match &cli.command {
        Commands::Run { targets, force } => cli::run::run_targets(&config, &targets.names, *force),
        Commands::Scan { targets } => cli::scan::scan_targets(&config, &targets.names),
        Commands::Check { targets } => cli::check::check_targets(&config, &targets.names),
    }
}
