//! Submitting the composed environment to Heat
//!
//! [`OrchestrationClient`] is the seam between composition and the backend.
//! The default [`HeatCliClient`] drives the `openstack` CLI: it creates the
//! stack when it does not exist yet and updates it otherwise. A rejection is
//! traced back to the environment file the backend complained about, so the
//! operator sees the reference they typed rather than a working-copy path.

use std::path::Path;

use log::{debug, info};

use crate::environments::EnvironmentFileList;
use crate::error::{Error, Result};
use crate::process::{CommandLine, CommandRunner};

/// One stack create-or-update request
#[derive(Debug, Clone, Copy)]
pub struct StackRequest<'a> {
    pub stack_name: &'a str,
    pub template: &'a Path,
    pub environment_files: &'a EnvironmentFileList,
}

/// Accepts stack requests
pub trait OrchestrationClient {
    /// Create or update the stack and wait for the outcome.
    fn submit(&self, request: &StackRequest<'_>) -> Result<()>;
}

/// Heat client backed by the `openstack` command line
pub struct HeatCliClient<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> HeatCliClient<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "openstack".to_string(),
        }
    }

    fn stack_exists(&self, stack_name: &str) -> Result<bool> {
        let show = CommandLine::new(&self.program)
            .args(["stack", "show", "-f", "value", "-c", "id"])
            .arg(stack_name);
        Ok(self.runner.output(&show)?.success)
    }

    /// The create or update command for `request`.
    pub fn stack_command(&self, request: &StackRequest<'_>, exists: bool) -> CommandLine {
        let action = if exists { "update" } else { "create" };
        let mut command = CommandLine::new(&self.program)
            .args(["stack", action, "--wait", "-t"])
            .arg(request.template.display().to_string());
        for path in request.environment_files.paths() {
            command = command.arg("-e").arg(path.display().to_string());
        }
        command.arg(request.stack_name)
    }
}

impl<R: CommandRunner> OrchestrationClient for HeatCliClient<R> {
    fn submit(&self, request: &StackRequest<'_>) -> Result<()> {
        let exists = self.stack_exists(request.stack_name)?;
        let command = self.stack_command(request, exists);
        info!(
            "{} stack {} with {} environment files",
            if exists { "Updating" } else { "Creating" },
            request.stack_name,
            request.environment_files.len()
        );
        debug!("{}", command);

        let output = self.runner.output(&command)?;
        if output.success {
            return Ok(());
        }

        let message = if output.stderr.trim().is_empty() {
            output.stdout.trim().to_string()
        } else {
            output.stderr.trim().to_string()
        };
        Err(Error::UpstreamRejection {
            env_file: request.environment_files.attribute(&message),
            message,
        })
    }
}
