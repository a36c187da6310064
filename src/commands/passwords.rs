//! # Passwords Command Implementation
//!
//! Runs the password merge on its own: generated defaults are combined with
//! whatever is already stored in the output directory and with `--set`
//! overrides, then written back in structured and legacy form.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use undercloud::defaults::default_output_dir;
use undercloud::output::{OutputConfig, Status};
use undercloud::passwords::{self, PasswordSet, RandomPasswordGenerator};

/// Generate, merge and store undercloud passwords
#[derive(Args, Debug)]
pub struct PasswordsArgs {
    /// Directory holding the password files.
    ///
    /// Defaults to the home directory.
    #[arg(long, value_name = "DIR", env = "UNDERCLOUD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Set a password explicitly, overriding stored and generated values
    /// (repeatable).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,
}

/// Execute the `passwords` command.
pub fn execute(args: PasswordsArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let output_dir = args.output_dir.unwrap_or_else(default_output_dir);
    let overrides = parse_overrides(&args.overrides)?;

    let merged = passwords::merge_passwords(
        &output_dir,
        &overrides,
        &RandomPasswordGenerator::default(),
    )
    .with_context(|| format!("Failed to store passwords in {}", output_dir.display()))?;

    println!(
        "{} {} passwords stored in {}",
        out.marker(Status::Ok),
        merged.len(),
        passwords::structured_path(&output_dir).display()
    );
    Ok(())
}

fn parse_overrides(raw: &[String]) -> Result<PasswordSet> {
    let mut overrides = PasswordSet::new();
    for item in raw {
        let Some((name, value)) = item.split_once('=') else {
            bail!("Invalid password override '{}': expected NAME=VALUE", item);
        };
        if name.is_empty() {
            bail!("Invalid password override '{}': name is empty", item);
        }
        overrides.insert(name.to_string(), value.to_string());
    }
    Ok(overrides)
}
