//! notemap - route and redirect tables for markdown notes sites.

mod cli;
mod collection;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod route;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(cli)?);

    match &cli.command {
        Commands::Build { .. } => cli::build::run_build(&config),
        Commands::Check { strict } => cli::check::run_check(&config, *strict),
        Commands::Resolve { paths, fresh, json } => {
            cli::resolve::run_resolve(&config, paths, *fresh, *json)
        }
        Commands::Serve { .. } => cli::serve::run_serve(),
    }
}
