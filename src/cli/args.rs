//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Route and redirect tables for a markdown notes site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory for routes.json (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: notemap.toml)
    #[arg(short = 'C', long, default_value = "notemap.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan content and write routes.json
    #[command(visible_alias = "b")]
    Build {
        /// Also write an HTML redirect stub for every redirect
        #[arg(long)]
        stubs: bool,
    },

    /// Check sidebar and navbar links against the built tables
    #[command(visible_alias = "c")]
    Check {
        /// Exit with an error when any link issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Show how request paths resolve
    #[command(visible_alias = "r")]
    Resolve {
        /// Request paths, e.g. `/old/path.html` or `/blog/?page=2`
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        /// Rebuild from content instead of reading routes.json
        #[arg(short, long)]
        fresh: bool,

        /// Print one JSON object per path
        #[arg(short, long)]
        json: bool,
    },

    /// Serve route lookups over HTTP, swapping in rebuilt tables on change
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },
}
