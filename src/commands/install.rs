//! # Install and Upgrade Command Implementation
//!
//! `install` and `upgrade` share their arguments. Without `--use-heat` they
//! run the legacy instack scripts; with it they run a single
//! `openstack undercloud deploy` built from `undercloud.conf`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::warn;

use undercloud::config::UndercloudConfig;
use undercloud::defaults::{default_config_path, default_output_dir};
use undercloud::install::{InstallMode, InstallPlan};
use undercloud::output::{OutputConfig, Status};
use undercloud::process::SystemRunner;

/// Arguments shared by `install` and `upgrade`
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Use the heat-based installer instead of the instack scripts.
    #[arg(long)]
    pub use_heat: bool,

    /// Do not run pre-flight validations.
    #[arg(long)]
    pub no_validations: bool,

    /// Path to undercloud.conf.
    ///
    /// Defaults to `~/undercloud.conf`.
    #[arg(long, value_name = "FILE", env = "UNDERCLOUD_CONF")]
    pub config: Option<PathBuf>,

    /// Output directory passed to the heat-based installer.
    ///
    /// Defaults to the home directory.
    #[arg(long, value_name = "DIR", env = "UNDERCLOUD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the `install` or `upgrade` command.
pub fn execute(args: InstallArgs, mode: InstallMode, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = args.config.unwrap_or_else(default_config_path);
    let config = UndercloudConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let output_dir = args.output_dir.unwrap_or_else(default_output_dir);

    if !args.no_validations && args.use_heat {
        warn!("Validations are not run by this tool; pass --no-validations to silence this");
    }

    let plan = InstallPlan::new(&config, mode, output_dir);
    if args.dry_run {
        for command in plan.commands(args.use_heat) {
            println!("{} {}", out.marker(Status::DryRun), command);
        }
        return Ok(());
    }

    let action = match mode {
        InstallMode::Install => "install",
        InstallMode::Upgrade => "upgrade",
    };
    plan.run(args.use_heat, &SystemRunner)
        .with_context(|| format!("Undercloud {} failed", action))?;
    println!("{} Undercloud {} complete", out.marker(Status::Ok), action);
    Ok(())
}
