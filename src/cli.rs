//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use pgforge::output::OutputConfig;

/// pgforge - PostgreSQL source builds manager
#[derive(Parser, Debug)]
#[command(name = "pgforge")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
    pgforge install 9.6.5 10 master
    pgforge pull    REL_10_STABLE
    pgforge remove  9.5
    pgforge status")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build & install a list of instances
    Install(commands::install::InstallArgs),

    /// Pull latest changes from the configured repositories
    Pull(commands::pull::PullArgs),

    /// Show some info for each build installed
    Status(commands::status::StatusArgs),

    /// Find matching branches and tags in the configured repositories
    Search(commands::search::SearchArgs),

    /// Remove specified builds
    Remove(commands::remove::RemoveArgs),

    /// Remove orphaned cloned repositories
    Purge(commands::purge::PurgeArgs),

    /// Show paths to the specified builds
    Path(commands::path::PathArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        OutputConfig::from_env_and_flag(&self.color).apply();

        match self.command {
            Commands::Install(args) => commands::install::execute(args),
            Commands::Pull(args) => commands::pull::execute(args),
            Commands::Status(args) => commands::status::execute(args),
            Commands::Search(args) => commands::search::execute(args),
            Commands::Remove(args) => commands::remove::execute(args),
            Commands::Purge(args) => commands::purge::execute(args),
            Commands::Path(args) => commands::path::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
