//! # Error Handling
//!
//! This module defines the centralized error type for the `undercloud`
//! library. It uses `thiserror` to build one `Error` enum covering every
//! failure the composition engine and its collaborators can report.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Variants that concern a file
//!   carry the offending path so the CLI can point the operator at it.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into a few groups:
//!
//! - Content errors: malformed YAML or INI in an environment or password file.
//! - Path errors: a reference that cannot be resolved or read.
//! - Persistence errors: a rewritten environment or password file could not be
//!   written or its permissions could not be set.
//! - Upstream rejections: the orchestration backend refused the composed
//!   environment.
//! - Command errors: an external program failed to start or exited non-zero.
//!
//! None of these are retried. Every error is terminal for the invocation.

use std::path::Path;

use thiserror::Error;

/// Main error type for undercloud operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing `undercloud.conf`.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Structured content in an environment or password file is malformed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A referenced path cannot be made sense of.
    #[error("Cannot resolve path {path}: {message}")]
    PathResolution { path: String, message: String },

    /// Writing a rewritten environment file or a password file failed.
    #[error("Failed to persist {path}: {message}")]
    Persistence { path: String, message: String },

    /// The orchestration backend rejected the composed environment.
    ///
    /// `env_file` is the reference the operator supplied when the rejection
    /// could be traced back to one of the submitted files.
    #[error("Orchestration rejected the deployment{}: {message}", env_file.as_ref().map(|f| format!(" (environment file: {})", f)).unwrap_or_default())]
    UpstreamRejection {
        env_file: Option<String>,
        message: String,
    },

    /// Processing one user environment file failed.
    #[error("Failed to process environment file {reference}: {source}")]
    EnvironmentFile {
        reference: String,
        #[source]
        source: Box<Error>,
    },

    /// The private working copy of the template tree could not be created.
    #[error("Failed to provision working tree: {message}")]
    Provision { message: String },

    /// The operating system random source failed.
    #[error("Password generation error: {message}")]
    PasswordGeneration { message: String },

    /// An external command could not be started or exited unsuccessfully.
    #[error("Command failed: {command} - {message}")]
    Command { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// An INI error, wrapped from `ini::Error`.
    #[error("INI error: {0}")]
    Ini(#[from] ini::Error),
}

impl Error {
    /// Build a `Parse` error for `path`.
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Error::Parse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Build a `Persistence` error for `path`.
    pub fn persistence(path: &Path, message: impl ToString) -> Self {
        Error::Persistence {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Build a `PathResolution` error for `path`.
    pub fn path_resolution(path: &Path, message: impl ToString) -> Self {
        Error::PathResolution {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
