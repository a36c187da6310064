//! External command execution
//!
//! Everything that reaches outside the process (the orchestration CLI, the
//! legacy installer scripts) goes through [`CommandRunner`], so callers can be
//! tested against a recording runner instead of real programs.

use std::fmt;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands
pub trait CommandRunner {
    /// Run with inherited stdio and fail unless the command succeeds.
    fn status(&self, command: &CommandLine) -> Result<()>;

    /// Run with captured output. A non-zero exit is not an error here.
    fn output(&self, command: &CommandLine) -> Result<CommandOutput>;
}

/// Runs commands with `std::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&self, command: &CommandLine) -> Result<()> {
        debug!("Running: {}", command);
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .map_err(|e| Error::Command {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Command {
                command: command.to_string(),
                message: status.to_string(),
            });
        }
        Ok(())
    }

    fn output(&self, command: &CommandLine) -> Result<CommandOutput> {
        debug!("Running: {}", command);
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Command {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
