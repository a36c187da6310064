//! Resource registry rewriting
//!
//! Heat environment files may map resource types onto template files through
//! their `resource_registry` section. Once an environment file has been moved
//! into the working copy, any entry that still points into the canonical
//! template tree must be redirected, otherwise the backend would load the
//! unmodified templates.
//!
//! Relative entries are resolved against the directory of the environment
//! file that declares them, not against the process working directory.
//! Entries that resolve outside the template tree are kept exactly as written.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::path::absolutize;
use crate::redirect::TemplateRedirector;

/// Top-level key holding the registry in an environment file
pub const RESOURCE_REGISTRY_KEY: &str = "resource_registry";

/// Rewrites `resource_registry` entries of environment files in place
#[derive(Debug, Clone, Copy)]
pub struct RegistryRewriter<'a> {
    redirector: &'a TemplateRedirector,
}

impl<'a> RegistryRewriter<'a> {
    pub fn new(redirector: &'a TemplateRedirector) -> Self {
        Self { redirector }
    }

    /// Rewrite the registry of `env_file`.
    ///
    /// Returns `true` when at least one entry changed and the file was written
    /// back. A file without a registry, or whose entries all stay the same, is
    /// not touched on disk.
    ///
    /// # Errors
    ///
    /// - `Error::PathResolution` if the file cannot be read.
    /// - `Error::Parse` if the content is not a YAML mapping.
    /// - `Error::Persistence` if the rewritten content cannot be written.
    pub fn rewrite(&self, env_file: &Path) -> Result<bool> {
        let env_file = if env_file.is_absolute() {
            env_file.to_path_buf()
        } else {
            absolutize(env_file, &std::env::current_dir()?)
        };

        let content =
            fs::read_to_string(&env_file).map_err(|e| Error::path_resolution(&env_file, e))?;
        let mut document: YamlValue =
            serde_yaml::from_str(&content).map_err(|e| Error::parse(&env_file, e))?;

        let env_dir = env_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let registry = match &mut document {
            YamlValue::Null => return Ok(false),
            YamlValue::Mapping(map) => match map.get_mut(RESOURCE_REGISTRY_KEY) {
                Some(YamlValue::Mapping(registry)) => registry,
                Some(YamlValue::Null) | None => return Ok(false),
                Some(_) => {
                    return Err(Error::parse(
                        &env_file,
                        "resource_registry must be a mapping",
                    ))
                }
            },
            _ => {
                return Err(Error::parse(
                    &env_file,
                    "environment file must contain a mapping",
                ))
            }
        };

        let mut changed = false;
        for (resource_type, value) in registry.iter_mut() {
            let Some(new_path) = self.redirect_entry(value, &env_dir) else {
                continue;
            };
            debug!(
                "{}: {:?} -> {}",
                env_file.display(),
                resource_type.as_str().unwrap_or("<non-string key>"),
                new_path
            );
            *value = YamlValue::String(new_path);
            changed = true;
        }

        if !changed {
            return Ok(false);
        }

        let rendered = serde_yaml::to_string(&document).map_err(|e| Error::persistence(&env_file, e))?;
        fs::write(&env_file, rendered).map_err(|e| Error::persistence(&env_file, e))?;
        info!("Rewrote resource registry in {}", env_file.display());
        Ok(true)
    }

    /// New value for one registry entry, or `None` when it stays as written.
    fn redirect_entry(&self, value: &YamlValue, env_dir: &Path) -> Option<String> {
        let raw = value.as_str()?;
        // Resource type aliases such as OS::Heat::None are not paths.
        if raw.is_empty() || raw.contains("::") {
            return None;
        }
        let candidate = absolutize(Path::new(raw), env_dir);
        let redirected = self.redirector.redirect(&candidate);
        if redirected == candidate {
            None
        } else {
            Some(redirected.display().to_string())
        }
    }
}
