//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::logging::{LogLevel, init_logging};

/// Collect debug logs from a cluster whose installation failed
#[derive(Parser)]
#[command(
    name = "bootstrap-gather",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Installation directory holding the Terraform state and install config
    #[arg(long, global = true, default_value = ".", env = "GATHER_DIR")]
    pub dir: PathBuf,

    /// Diagnostic log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Gather debugging data for a given installation failure
    ///
    /// When an installation fails, collecting everything useful for debugging
    /// can be difficult. These commands collect the most relevant information
    /// from the machines involved.
    #[command(subcommand)]
    Gather(commands::gather::GatherCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if logging cannot be initialized or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            dir,
            log_level,
            quiet,
            no_color,
            command,
        } = self;
        init_logging(log_level)?;
        let app = AppContext::new(&OutputFlags { no_color, quiet }, dir);
        match command {
            Command::Gather(cmd) => commands::gather::run(cmd, &app).await,
        }
    }
}
