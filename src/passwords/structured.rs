//! Structured passwords file (`{parameter_defaults: {...}}`)

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Value as YamlValue;

use super::{create_private, PasswordSet};
use crate::error::{Error, Result};

#[derive(Serialize)]
struct PasswordsEnvironment<'a> {
    parameter_defaults: &'a PasswordSet,
}

/// Load `parameter_defaults` from an existing passwords environment.
///
/// Returns `Ok(None)` when the file does not exist. Numeric and boolean
/// values are read as their string form; null values are skipped.
pub fn load(path: &Path) -> Result<Option<PasswordSet>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| Error::path_resolution(path, e))?;
    let document: YamlValue = serde_yaml::from_str(&content).map_err(|e| Error::parse(path, e))?;

    let document = match document {
        YamlValue::Null => return Ok(Some(PasswordSet::new())),
        YamlValue::Mapping(map) => map,
        _ => return Err(Error::parse(path, "passwords file must contain a mapping")),
    };
    let defaults = match document.get("parameter_defaults") {
        None | Some(YamlValue::Null) => return Ok(Some(PasswordSet::new())),
        Some(YamlValue::Mapping(map)) => map,
        Some(_) => return Err(Error::parse(path, "parameter_defaults must be a mapping")),
    };

    let mut set = PasswordSet::new();
    for (key, value) in defaults {
        let name = key
            .as_str()
            .ok_or_else(|| Error::parse(path, format!("non-string password name {:?}", key)))?;
        let secret = match value {
            YamlValue::Null => continue,
            YamlValue::String(s) => s.clone(),
            YamlValue::Number(n) => n.to_string(),
            YamlValue::Bool(b) => b.to_string(),
            _ => {
                return Err(Error::parse(
                    path,
                    format!("value of {} is not a scalar", name),
                ))
            }
        };
        set.insert(name.to_string(), secret);
    }
    Ok(Some(set))
}

/// Write `set` as a passwords environment, replacing the whole file.
///
/// The file is restricted to its owner before the secrets are written.
pub fn write(path: &Path, set: &PasswordSet) -> Result<()> {
    let rendered = serde_yaml::to_string(&PasswordsEnvironment {
        parameter_defaults: set,
    })
    .map_err(|e| Error::persistence(path, e))?;
    create_private(path)?
        .write_all(rendered.as_bytes())
        .map_err(|e| Error::persistence(path, e))
}
