//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use undercloud::install::InstallMode;

use crate::commands;

/// Undercloud - Compose Heat environments and deploy or upgrade an undercloud
#[derive(Parser, Debug)]
#[command(name = "undercloud")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose the environment and create or update the undercloud stack
    Deploy(commands::deploy::DeployArgs),

    /// Generate, merge and store undercloud passwords
    Passwords(commands::passwords::PasswordsArgs),

    /// Install the undercloud
    Install(commands::install::InstallArgs),

    /// Upgrade the undercloud
    Upgrade(commands::install::InstallArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Deploy(args) => commands::deploy::execute(args, &self.color),
            Commands::Passwords(args) => commands::passwords::execute(args, &self.color),
            Commands::Install(args) => {
                commands::install::execute(args, InstallMode::Install, &self.color)
            }
            Commands::Upgrade(args) => {
                commands::install::execute(args, InstallMode::Upgrade, &self.color)
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialise `env_logger` from `--log-level`; `RUST_LOG` refines it when set.
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).format_target(false);
    // A logger may already be installed when running inside tests.
    let _ = builder.try_init();
}
