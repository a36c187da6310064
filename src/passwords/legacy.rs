//! Legacy INI passwords file (`undercloud-passwords.conf`)
//!
//! Only a handful of legacy keys are read back, because the legacy installer
//! named them differently from their Heat parameters. When the file is
//! written it gets one `undercloud_<snake_case>` key per secret whose Heat
//! name contains `Password` or `Token`.

use std::path::Path;

use ini::Ini;
use regex::Regex;

use super::{create_private, PasswordSet};
use crate::error::{Error, Result};

/// INI section holding the secrets
pub const AUTH_SECTION: &str = "auth";

/// Legacy keys that are imported, with the Heat parameter they map to
pub const LEGACY_KEY_MAP: &[(&str, &str)] = &[
    ("undercloud_db_password", "MysqlRootPassword"),
    ("undercloud_heat_encryption_key", "HeatAuthEncryptionKey"),
];

/// Load the known legacy keys from `path`.
pub fn load(path: &Path) -> Result<PasswordSet> {
    let conf = Ini::load_from_file(path).map_err(|e| match e {
        ini::Error::Io(e) => Error::path_resolution(path, e),
        other => Error::parse(path, other),
    })?;

    let mut set = PasswordSet::new();
    if let Some(auth) = conf.section(Some(AUTH_SECTION)) {
        for (legacy_key, name) in LEGACY_KEY_MAP {
            if let Some(value) = auth.get(*legacy_key) {
                set.insert(name.to_string(), value.to_string());
            }
        }
    }
    Ok(set)
}

/// Write `set` in legacy format, replacing the whole file.
///
/// The file is restricted to its owner before the secrets are written.
pub fn write(path: &Path, set: &PasswordSet) -> Result<()> {
    let mut conf = Ini::new();
    for (name, secret) in set {
        if name.contains("Password") || name.contains("Token") {
            conf.with_section(Some(AUTH_SECTION))
                .set(format!("undercloud_{}", snake_case(name)?), secret.as_str());
        }
    }
    let mut file = create_private(path)?;
    conf.write_to(&mut file)
        .map_err(|e| Error::persistence(path, e))
}

/// Convert a CamelCase Heat parameter name to snake_case.
pub fn snake_case(name: &str) -> Result<String> {
    let words = Regex::new(r"(.)([A-Z][a-z]+)")?;
    let humps = Regex::new(r"([a-z0-9])([A-Z])")?;
    let step = words.replace_all(name, "${1}_${2}");
    Ok(humps.replace_all(&step, "${1}_${2}").to_lowercase())
}
