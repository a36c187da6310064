//! Template redirection
//!
//! Environment files that live inside the canonical template tree are never
//! handed to the orchestration backend directly. They are redirected to the
//! per-run working copy, where they may be rewritten safely.

use std::path::{Path, PathBuf};

use crate::path::{absolutize, classify, expand_user, Classification};

/// A user environment reference after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEnvironmentPath {
    /// The reference points into the template tree.
    InsideTemplateTree {
        /// The reference as the user wrote it.
        original: String,
        /// The equivalent absolute path inside the working copy.
        redirected: PathBuf,
    },
    /// The reference points anywhere else and is used verbatim.
    OutsideTemplateTree { original: String },
}

impl ResolvedEnvironmentPath {
    /// The path to submit downstream.
    pub fn submitted_path(&self) -> PathBuf {
        match self {
            ResolvedEnvironmentPath::InsideTemplateTree { redirected, .. } => redirected.clone(),
            ResolvedEnvironmentPath::OutsideTemplateTree { original } => PathBuf::from(original),
        }
    }

    /// The reference as originally supplied.
    pub fn original(&self) -> &str {
        match self {
            ResolvedEnvironmentPath::InsideTemplateTree { original, .. }
            | ResolvedEnvironmentPath::OutsideTemplateTree { original } => original,
        }
    }
}

/// Maps paths in the canonical template tree onto the working copy
#[derive(Debug, Clone)]
pub struct TemplateRedirector {
    template_root: PathBuf,
    working_root: PathBuf,
}

impl TemplateRedirector {
    /// Both roots must be absolute; they are normalized here.
    pub fn new(template_root: impl AsRef<Path>, working_root: impl AsRef<Path>) -> Self {
        Self {
            template_root: crate::path::normalize(template_root.as_ref()),
            working_root: crate::path::normalize(working_root.as_ref()),
        }
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    /// Redirect an absolute path into the working copy.
    ///
    /// Paths already under the working root, paths outside the template tree
    /// and relative paths are returned unchanged, which makes this idempotent
    /// even when the working root is nested inside the template root.
    pub fn redirect(&self, path: &Path) -> PathBuf {
        if classify(path, &self.working_root).is_in_root() {
            return path.to_path_buf();
        }
        match classify(path, &self.template_root) {
            Classification::InRoot(relative) if relative.as_os_str().is_empty() => {
                self.working_root.clone()
            }
            Classification::InRoot(relative) => self.working_root.join(relative),
            Classification::NotInRoot => path.to_path_buf(),
        }
    }

    /// Classify a user-supplied reference.
    ///
    /// `~` is expanded against `home`, then relative references are resolved
    /// against `cwd` before classification. The original spelling is kept for
    /// references outside the template tree.
    pub fn resolve(&self, reference: &str, cwd: &Path, home: Option<&Path>) -> ResolvedEnvironmentPath {
        let absolute = absolutize(&expand_user(reference, home), cwd);
        if classify(&absolute, &self.working_root).is_in_root() {
            return ResolvedEnvironmentPath::OutsideTemplateTree {
                original: reference.to_string(),
            };
        }
        if classify(&absolute, &self.template_root).is_in_root() {
            ResolvedEnvironmentPath::InsideTemplateTree {
                original: reference.to_string(),
                redirected: self.redirect(&absolute),
            }
        } else {
            ResolvedEnvironmentPath::OutsideTemplateTree {
                original: reference.to_string(),
            }
        }
    }
}
