//! Generated deployment parameters
//!
//! Values the operator passes on the command line (control plane address,
//! domain, virtual IPs) are turned into a small environment file of
//! `parameter_defaults`, written next to the working copy.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// File name of the generated parameters environment
pub const PARAMETERS_FILE_NAME: &str = "undercloud-parameters.yaml";

/// Deployment values supplied by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentParameters {
    /// Control plane address in CIDR notation, e.g. `192.168.24.1/24`
    pub local_ip: Option<String>,
    pub local_domain: Option<String>,
    pub public_virtual_ip: Option<String>,
    pub control_virtual_ip: Option<String>,
}

impl DeploymentParameters {
    pub fn is_empty(&self) -> bool {
        self.local_ip.is_none()
            && self.local_domain.is_none()
            && self.public_virtual_ip.is_none()
            && self.control_virtual_ip.is_none()
    }

    /// Render the values as Heat `parameter_defaults`.
    pub fn parameter_defaults(&self) -> Mapping {
        let mut params = Mapping::new();
        if let Some(local_ip) = &self.local_ip {
            let (address, prefix) = match local_ip.split_once('/') {
                Some((address, prefix)) => (address, Some(prefix)),
                None => (local_ip.as_str(), None),
            };
            params.insert("LocalIp".into(), address.into());
            if let Some(prefix) = prefix {
                params.insert("ControlPlaneSubnetCidr".into(), prefix.into());
            }
        }
        if let Some(domain) = &self.local_domain {
            params.insert("CloudDomain".into(), domain.as_str().into());
        }
        if let Some(ip) = &self.public_virtual_ip {
            params.insert("PublicVirtualFixedIPs".into(), fixed_ips(ip));
        }
        if let Some(ip) = &self.control_virtual_ip {
            params.insert("ControlFixedIPs".into(), fixed_ips(ip));
        }
        params
    }

    /// Write the parameters environment into `dir`.
    ///
    /// Returns `None` without touching the filesystem when no value was given.
    pub fn write(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if self.is_empty() {
            return Ok(None);
        }
        let path = dir.join(PARAMETERS_FILE_NAME);
        let mut document = Mapping::new();
        document.insert(
            "parameter_defaults".into(),
            YamlValue::Mapping(self.parameter_defaults()),
        );
        let rendered = serde_yaml::to_string(&document).map_err(|e| Error::persistence(&path, e))?;
        fs::write(&path, rendered).map_err(|e| Error::persistence(&path, e))?;
        debug!("Wrote deployment parameters to {}", path.display());
        Ok(Some(path))
    }
}

fn fixed_ips(ip: &str) -> YamlValue {
    let mut entry = Mapping::new();
    entry.insert("ip_address".into(), ip.into());
    YamlValue::Sequence(vec![YamlValue::Mapping(entry)])
}
