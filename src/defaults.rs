//! Default values for undercloud configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Canonical template tree installed by the templates package
pub const DEFAULT_TEMPLATE_ROOT: &str = "/usr/share/openstack-tripleo-heat-templates/";
/// Template submitted for the undercloud stack, relative to the template root
pub const DEFAULT_STACK_TEMPLATE: &str = "overcloud.yaml";
pub const DEFAULT_STACK_NAME: &str = "undercloud";
pub const DEFAULT_LOCAL_IP: &str = "192.168.24.1/24";
pub const DEFAULT_PUBLIC_HOST: &str = "192.168.24.2";
pub const DEFAULT_ADMIN_HOST: &str = "192.168.24.3";
pub const DEFAULT_DOMAIN_NAME: &str = "localdomain";
const CONF_FILE_NAME: &str = "undercloud.conf";

/// Returns the directory password files and deploy output are written to.
///
/// This is the invoking user's home directory, falling back to the current
/// directory if it cannot be determined.
///
/// This can be overridden by the `--output-dir` CLI flag or the
/// `UNDERCLOUD_OUTPUT_DIR` environment variable.
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default location of `undercloud.conf` (`~/undercloud.conf`).
///
/// This can be overridden by the `--config` CLI flag or the
/// `UNDERCLOUD_CONF` environment variable.
pub fn default_config_path() -> PathBuf {
    default_output_dir().join(CONF_FILE_NAME)
}
