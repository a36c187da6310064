//! # Environment List Composition
//!
//! Builds the ordered list of environment files submitted with a deployment.
//! Order matters: when the backend merges environments, later files override
//! earlier ones. The list is always laid out as
//!
//! 1. base files from the working copy, with the generated parameters file
//!    right after the resource registry,
//! 2. feature files, in feature table order,
//! 3. the container images file, when configured,
//! 4. the operator's files, in the order given,
//! 5. the generated passwords file.
//!
//! Operator files that live in the template tree are redirected into the
//! working copy and have their resource registry rewritten there. Anything
//! else is passed through exactly as the operator spelled it. Repeated files
//! are kept; the backend already lets the last occurrence win.

pub mod features;
pub mod parameters;

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::passwords::{self, PasswordGenerator, PasswordSet};
use crate::redirect::{ResolvedEnvironmentPath, TemplateRedirector};
use crate::registry::RegistryRewriter;

pub use features::{Feature, FeatureFlags, FEATURE_TABLE};
pub use parameters::DeploymentParameters;

/// Resource registry every deployment starts from
pub const RESOURCE_REGISTRY_FILE: &str = "overcloud-resource-registry-puppet.yaml";
/// Undercloud role parameters
pub const UNDERCLOUD_ENV_FILE: &str = "environments/undercloud.yaml";
/// Config-download settings
pub const CONFIG_DOWNLOAD_ENV_FILE: &str = "environments/config-download-environment.yaml";
/// Deployed-server control plane port without a Neutron port
pub const DEPLOYED_SERVER_NOOP_ENV_FILE: &str =
    "environments/deployed-server-noop-ctlplane.yaml";

/// Where an entry of the list came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum EntrySource {
    /// A fixed base file
    Base,
    /// Generated deployment parameters
    Parameters,
    /// A feature file
    Feature(Feature),
    /// The container images file, with the reference as configured
    ContainerImages(String),
    /// An operator file, with the reference as given
    User(String),
    /// The generated passwords file
    Passwords,
}

/// One file of the composed list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentEntry {
    pub path: PathBuf,
    pub source: EntrySource,
}

/// Ordered environment files for one deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentFileList {
    entries: Vec<EnvironmentEntry>,
}

impl EnvironmentFileList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf, source: EntrySource) {
        self.entries.push(EnvironmentEntry { path, source });
    }

    pub fn entries(&self) -> &[EnvironmentEntry] {
        &self.entries
    }

    /// Paths in submission order.
    pub fn paths(&self) -> Vec<&Path> {
        self.entries.iter().map(|e| e.path.as_path()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry a backend message refers to and name it the way the
    /// operator would recognise it.
    ///
    /// The longest submitted path that occurs in `message` wins, so a file is
    /// not confused with a sibling whose path is a prefix of its own. Operator
    /// files report the reference as given, other files their path.
    pub fn attribute(&self, message: &str) -> Option<String> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let shown = entry.path.display().to_string();
                message.contains(&shown).then_some((shown, entry))
            })
            .max_by_key(|(shown, _)| shown.len())
            .map(|(shown, entry)| match &entry.source {
                EntrySource::User(reference) | EntrySource::ContainerImages(reference) => {
                    reference.clone()
                }
                _ => shown,
            })
    }
}

/// Flags controlling which optional files are included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFlags {
    pub features: FeatureFlags,
    /// Include the deployed-server noop control plane environment
    pub deployed_server_noop: bool,
}

impl Default for BuildFlags {
    fn default() -> Self {
        Self {
            features: FeatureFlags::new(),
            deployed_server_noop: true,
        }
    }
}

/// Composes the environment file list for one deployment
pub struct EnvironmentListBuilder<'a> {
    redirector: &'a TemplateRedirector,
    password_dir: PathBuf,
    generator: &'a dyn PasswordGenerator,
    password_overrides: PasswordSet,
    parameters_file: Option<PathBuf>,
    container_images_file: Option<PathBuf>,
    cwd: PathBuf,
    home: Option<PathBuf>,
}

impl<'a> EnvironmentListBuilder<'a> {
    /// Create a builder writing passwords into `password_dir`.
    ///
    /// Relative operator references resolve against the process working
    /// directory and `~` against the user's home unless overridden.
    pub fn new(
        redirector: &'a TemplateRedirector,
        password_dir: impl Into<PathBuf>,
        generator: &'a dyn PasswordGenerator,
    ) -> Result<Self> {
        Ok(Self {
            redirector,
            password_dir: password_dir.into(),
            generator,
            password_overrides: PasswordSet::new(),
            parameters_file: None,
            container_images_file: None,
            cwd: std::env::current_dir()?,
            home: dirs::home_dir(),
        })
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn with_password_overrides(mut self, overrides: PasswordSet) -> Self {
        self.password_overrides = overrides;
        self
    }

    /// Include a generated parameters environment among the base files.
    pub fn with_parameters_file(mut self, path: Option<PathBuf>) -> Self {
        self.parameters_file = path;
        self
    }

    /// Include the container images environment ahead of the operator's
    /// files. It is resolved and rewritten like an operator file.
    pub fn with_container_images_file(mut self, path: Option<PathBuf>) -> Self {
        self.container_images_file = path;
        self
    }

    /// Compose the list.
    ///
    /// # Errors
    ///
    /// A failure while processing an operator file is returned as
    /// `Error::EnvironmentFile` naming that file; nothing is skipped.
    /// Password merge failures are returned as is.
    pub fn build(&self, user_env_files: &[String], flags: &BuildFlags) -> Result<EnvironmentFileList> {
        let root = self.redirector.working_root();
        let mut list = EnvironmentFileList::new();

        list.push(root.join(RESOURCE_REGISTRY_FILE), EntrySource::Base);
        if let Some(parameters) = &self.parameters_file {
            list.push(parameters.clone(), EntrySource::Parameters);
        }
        list.push(root.join(UNDERCLOUD_ENV_FILE), EntrySource::Base);
        list.push(root.join(CONFIG_DOWNLOAD_ENV_FILE), EntrySource::Base);
        if flags.deployed_server_noop {
            list.push(root.join(DEPLOYED_SERVER_NOOP_ENV_FILE), EntrySource::Base);
        }

        for (feature, path) in flags.features.files(root) {
            list.push(path, EntrySource::Feature(feature));
        }

        let rewriter = RegistryRewriter::new(self.redirector);
        if let Some(images) = &self.container_images_file {
            let reference = images.display().to_string();
            let path = self.process_user_file(&reference, &rewriter)?;
            list.push(path, EntrySource::ContainerImages(reference));
        }
        for reference in user_env_files {
            let path = self.process_user_file(reference, &rewriter)?;
            list.push(path, EntrySource::User(reference.clone()));
        }

        passwords::merge_passwords(
            &self.password_dir,
            &self.password_overrides,
            self.generator,
        )?;
        list.push(
            passwords::structured_path(&self.password_dir),
            EntrySource::Passwords,
        );

        info!("Composed {} environment files", list.len());
        Ok(list)
    }

    fn process_user_file(&self, reference: &str, rewriter: &RegistryRewriter<'_>) -> Result<PathBuf> {
        self.resolve_and_rewrite(reference, rewriter)
            .map_err(|e| Error::EnvironmentFile {
                reference: reference.to_string(),
                source: Box::new(e),
            })
    }

    fn resolve_and_rewrite(&self, reference: &str, rewriter: &RegistryRewriter<'_>) -> Result<PathBuf> {
        match self
            .redirector
            .resolve(reference, &self.cwd, self.home.as_deref())
        {
            ResolvedEnvironmentPath::InsideTemplateTree { redirected, .. } => {
                debug!("Redirecting {} to {}", reference, redirected.display());
                rewriter.rewrite(&redirected)?;
                Ok(redirected)
            }
            ResolvedEnvironmentPath::OutsideTemplateTree { original } => Ok(PathBuf::from(original)),
        }
    }
}
