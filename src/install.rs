//! Install and upgrade command composition
//!
//! Two installers exist side by side. The legacy path runs the instack
//! scripts. The heat-based path runs `openstack undercloud deploy` with the
//! templates, feature environments and virtual IPs taken from
//! `undercloud.conf`.

use std::path::PathBuf;

use log::info;

use crate::config::UndercloudConfig;
use crate::environments::parameters::PARAMETERS_FILE_NAME;
use crate::environments::{Feature, FEATURE_TABLE, CONFIG_DOWNLOAD_ENV_FILE, UNDERCLOUD_ENV_FILE};
use crate::error::{Error, Result};
use crate::process::{CommandLine, CommandRunner};

/// Which installer action to compose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Install,
    Upgrade,
}

/// Composes installer command lines from configuration
#[derive(Debug, Clone)]
pub struct InstallPlan<'a> {
    config: &'a UndercloudConfig,
    mode: InstallMode,
    output_dir: PathBuf,
}

impl<'a> InstallPlan<'a> {
    pub fn new(config: &'a UndercloudConfig, mode: InstallMode, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            mode,
            output_dir: output_dir.into(),
        }
    }

    /// Commands run by the legacy instack installer.
    pub fn legacy_commands(&self) -> Vec<CommandLine> {
        match self.mode {
            InstallMode::Install => vec![CommandLine::new("instack-install-undercloud")],
            InstallMode::Upgrade => vec![
                CommandLine::new("sudo").args(["yum", "update", "-y", "instack-undercloud"]),
                CommandLine::new("instack-pre-upgrade-undercloud"),
                CommandLine::new("instack-upgrade-undercloud"),
                CommandLine::new("sudo").args(["systemctl", "restart", "openstack-nova-api"]),
            ],
        }
    }

    /// The `openstack undercloud deploy` command line.
    pub fn heat_deploy_command(&self) -> CommandLine {
        let config = self.config;
        let templates = &config.templates;
        let template_path = |relative: &str| templates.join(relative).display().to_string();

        let mut command = CommandLine::new("sudo")
            .args(["openstack", "undercloud", "deploy"])
            .arg(format!("--local-domain={}", config.overcloud_domain_name))
            .arg(format!("--local-ip={}", config.local_ip))
            .arg(format!("--templates={}", templates.display()));

        if self.mode == InstallMode::Upgrade {
            for file in feature_files(Feature::Upgrade) {
                command = command.arg("-e").arg(template_path(file));
            }
        }
        if config.heat_native {
            command = command.arg("--heat-native");
        }
        if let Some(images) = &config.container_images_file {
            command = command.arg("-e").arg(images.display().to_string());
        }

        let features = config.features();
        for (_, path) in features.files(templates) {
            command = command.arg("-e").arg(path.display().to_string());
        }
        if features.is_enabled(Feature::Tls) {
            command = command
                .arg("--public-virtual-ip")
                .arg(&config.undercloud_public_host)
                .arg("--control-virtual-ip")
                .arg(&config.undercloud_admin_host);
        }

        command = command
            .arg("-e")
            .arg(template_path(CONFIG_DOWNLOAD_ENV_FILE))
            .arg("-e")
            .arg(template_path(UNDERCLOUD_ENV_FILE))
            .arg("-e")
            .arg(self.parameters_file().display().to_string())
            .arg(format!("--output-dir={}", self.output_dir.display()));
        if config.undercloud_debug {
            command = command.arg("--debug");
        }
        command
    }

    /// Commands for the selected installer, in execution order.
    pub fn commands(&self, use_heat: bool) -> Vec<CommandLine> {
        if use_heat {
            vec![self.heat_deploy_command()]
        } else {
            self.legacy_commands()
        }
    }

    /// Generated parameters environment passed to the heat-based installer.
    pub fn parameters_file(&self) -> PathBuf {
        self.output_dir.join(PARAMETERS_FILE_NAME)
    }

    /// Write the parameters environment named by [`Self::parameters_file`].
    pub fn write_parameters(&self) -> Result<PathBuf> {
        self.config
            .deployment_parameters()
            .write(&self.output_dir)?
            .ok_or_else(|| Error::persistence(&self.parameters_file(), "no parameters to write"))
    }

    /// Run the commands in order, stopping at the first failure.
    ///
    /// The heat-based installer gets its parameters environment written first.
    pub fn run(&self, use_heat: bool, runner: &dyn CommandRunner) -> Result<()> {
        if use_heat {
            let path = self.write_parameters()?;
            info!("Wrote installer parameters to {}", path.display());
        }
        for command in self.commands(use_heat) {
            info!("Running: {}", command);
            runner.status(&command)?;
        }
        Ok(())
    }
}

fn feature_files(feature: Feature) -> &'static [&'static str] {
    FEATURE_TABLE
        .iter()
        .find(|(f, _)| *f == feature)
        .map(|(_, files)| *files)
        .unwrap_or(&[])
}
