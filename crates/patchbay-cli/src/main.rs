//! Patchbay CLI - Command-line interface for the patchbay graph engine.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use patchbay_config::EngineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(author, version, about = "Patchbay modular graph CLI", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available module types
    Modules(commands::modules::ModulesArgs),

    /// Show the parameters and ports of a module type
    Describe(commands::describe::DescribeArgs),

    /// Build and run a small demo patch
    Demo(commands::demo::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;

    let fallback = config.log_filter.clone();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();

    // Logged here rather than in `load`, which runs before the subscriber exists.
    match &cli.config {
        Some(path) => tracing::debug!(
            path = %path.display(),
            backend_available = config.backend_available,
            "config loaded"
        ),
        None => tracing::debug!(
            backend_available = config.backend_available,
            "no config file, using defaults"
        ),
    }

    match cli.command {
        Commands::Modules(args) => commands::modules::run(&config, args),
        Commands::Describe(args) => commands::describe::run(&config, args),
        Commands::Demo(args) => commands::demo::run(&config, args),
    }
}
