//! Kiln - a markdown static site builder.

mod asset;
mod build;
mod config;
mod content;
mod error;
mod generator;
mod logger;
mod markdown;
mod render;
mod taxonomy;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser, Subcommand};
use config::SiteConfig;
use std::path::PathBuf;

/// Kiln static site builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,

    /// Site root directory (default: current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    root: Option<PathBuf>,

    /// Config file path (default: kiln.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Build the site into the output directory
    #[command(visible_alias = "b")]
    Build,
}

fn main() -> Result<()> {
    build::state::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let config = SiteConfig::load(&root, cli.config.as_deref())?;

    match cli.command {
        Commands::Build => build::build_site(&config).map(|_| ()),
    }
}
