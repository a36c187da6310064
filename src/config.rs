//! # Undercloud Configuration
//!
//! This module loads `undercloud.conf`, the operator-facing INI file that
//! drives `install` and `upgrade`. Only the `[DEFAULT]` section is read; keys
//! outside the known set are logged and ignored so that configuration written
//! for the legacy installer keeps working.
//!
//! ## Key Components
//!
//! - **`UndercloudConfig`**: typed view of the file with defaults for every
//!   value, so a missing file yields a usable configuration.
//!
//! - **`UndercloudConfig::load`** / **`UndercloudConfig::from_ini_str`**:
//!   parse from disk or from a string.
//!
//! Invalid values are reported as `Error::ConfigParse` with a hint naming
//! the expected format.

use std::path::{Path, PathBuf};

use ini::Ini;
use log::{debug, info, warn};

use crate::defaults;
use crate::environments::{DeploymentParameters, Feature, FeatureFlags};
use crate::error::{Error, Result};

const DEFAULT_SECTION: &str = "DEFAULT";

/// Settings read from `undercloud.conf`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndercloudConfig {
    /// Control plane address in CIDR notation
    pub local_ip: String,
    /// Public virtual IP
    pub undercloud_public_host: String,
    /// Control plane virtual IP
    pub undercloud_admin_host: String,
    pub overcloud_domain_name: String,
    /// Canonical template tree
    pub templates: PathBuf,
    /// Environment file listing container images
    pub container_images_file: Option<PathBuf>,
    pub enable_ironic: bool,
    pub enable_ironic_inspector: bool,
    pub enable_mistral: bool,
    pub enable_zaqar: bool,
    pub enable_ui: bool,
    /// Serve public endpoints over TLS
    pub generate_service_certificate: bool,
    pub undercloud_debug: bool,
    /// Run a transient Heat process instead of talking to a Heat service
    pub heat_native: bool,
}

impl Default for UndercloudConfig {
    fn default() -> Self {
        Self {
            local_ip: defaults::DEFAULT_LOCAL_IP.to_string(),
            undercloud_public_host: defaults::DEFAULT_PUBLIC_HOST.to_string(),
            undercloud_admin_host: defaults::DEFAULT_ADMIN_HOST.to_string(),
            overcloud_domain_name: defaults::DEFAULT_DOMAIN_NAME.to_string(),
            templates: PathBuf::from(defaults::DEFAULT_TEMPLATE_ROOT),
            container_images_file: None,
            enable_ironic: true,
            enable_ironic_inspector: true,
            enable_mistral: true,
            enable_zaqar: true,
            enable_ui: true,
            generate_service_certificate: true,
            undercloud_debug: true,
            heat_native: true,
        }
    }
}

impl UndercloudConfig {
    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error: every value then takes its default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "{} not found, using default configuration",
                path.display()
            );
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::path_resolution(path, e))?;
        debug!("Loading configuration from {}", path.display());
        Self::from_ini_str(&content)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let conf = Ini::load_from_str(content).map_err(|e| Error::ConfigParse {
            message: format!("undercloud.conf is not valid INI: {}", e),
            hint: Some("Check for unterminated section headers or quotes".to_string()),
        })?;
        let mut config = Self::default();

        let section = conf
            .section(Some(DEFAULT_SECTION))
            .or_else(|| conf.section(None::<String>));
        let Some(section) = section else {
            return Ok(config);
        };

        for (key, value) in section.iter() {
            let value = value.trim();
            match key {
                "local_ip" => config.local_ip = parse_cidr(key, value)?,
                "undercloud_public_host" => config.undercloud_public_host = value.to_string(),
                "undercloud_admin_host" => config.undercloud_admin_host = value.to_string(),
                "overcloud_domain_name" => config.overcloud_domain_name = value.to_string(),
                "templates" => config.templates = PathBuf::from(value),
                "container_images_file" => {
                    config.container_images_file =
                        (!value.is_empty()).then(|| PathBuf::from(value))
                }
                "enable_ironic" => config.enable_ironic = parse_bool(key, value)?,
                "enable_ironic_inspector" => {
                    config.enable_ironic_inspector = parse_bool(key, value)?
                }
                "enable_mistral" => config.enable_mistral = parse_bool(key, value)?,
                "enable_zaqar" => config.enable_zaqar = parse_bool(key, value)?,
                "enable_ui" => config.enable_ui = parse_bool(key, value)?,
                "generate_service_certificate" => {
                    config.generate_service_certificate = parse_bool(key, value)?
                }
                "undercloud_debug" => config.undercloud_debug = parse_bool(key, value)?,
                "heat_native" => config.heat_native = parse_bool(key, value)?,
                other => warn!("Ignoring unknown option '{}' in undercloud.conf", other),
            }
        }
        Ok(config)
    }

    /// Features switched on by this configuration.
    ///
    /// HAProxy, keepalived and containers are always part of a heat-based
    /// undercloud; the rest follow their `enable_*` options.
    pub fn features(&self) -> FeatureFlags {
        let mut flags = FeatureFlags::new();
        let toggles = [
            (Feature::Ironic, self.enable_ironic),
            (Feature::IronicInspector, self.enable_ironic_inspector),
            (Feature::Mistral, self.enable_mistral),
            (Feature::Zaqar, self.enable_zaqar),
            (Feature::Ui, self.enable_ui),
            (Feature::Tls, self.generate_service_certificate),
            (Feature::Ha, true),
            (Feature::Docker, true),
        ];
        for (feature, enabled) in toggles {
            if enabled {
                flags.enable(feature);
            }
        }
        flags
    }

    /// Values written into the parameters environment of a heat-based
    /// install.
    pub fn deployment_parameters(&self) -> DeploymentParameters {
        DeploymentParameters {
            local_ip: Some(self.local_ip.clone()),
            local_domain: Some(self.overcloud_domain_name.clone()),
            public_virtual_ip: Some(self.undercloud_public_host.clone()),
            control_virtual_ip: Some(self.undercloud_admin_host.clone()),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::ConfigParse {
            message: format!("{} must be a boolean, got '{}'", key, value),
            hint: Some("Use true or false".to_string()),
        }),
    }
}

fn parse_cidr(key: &str, value: &str) -> Result<String> {
    let invalid = || Error::ConfigParse {
        message: format!("{} is not a CIDR address: '{}'", key, value),
        hint: Some("Use an address with a prefix length, e.g. 192.168.24.1/24".to_string()),
    };
    let (address, prefix) = value.split_once('/').ok_or_else(invalid)?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max_prefix = if address.contains(':') { 128 } else { 32 };
    if address.is_empty() || prefix > max_prefix {
        return Err(invalid());
    }
    Ok(value.to_string())
}
