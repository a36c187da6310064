//! Private working copy of the template tree
//!
//! Every deployment runs against its own copy of the canonical templates, so
//! that registry rewriting never touches the installed tree. The copy lives in
//! a fresh temporary directory as `<tmp>/templates` and is removed when the
//! `WorkingTree` is dropped, unless it was kept with [`WorkingTree::keep`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{Error, Result};

const DIR_PREFIX: &str = "undercloud-deploy-";
const TEMPLATES_DIR: &str = "templates";

/// A provisioned copy of the template tree
#[derive(Debug)]
pub struct WorkingTree {
    dir: TempDir,
    root: PathBuf,
}

impl WorkingTree {
    /// Copy `template_root` into a new directory under the system temp dir.
    pub fn provision(template_root: &Path) -> Result<Self> {
        Self::provision_in(template_root, &std::env::temp_dir())
    }

    /// Copy `template_root` into a new directory under `parent`.
    ///
    /// Symlinks in the source tree are followed and copied as regular files.
    pub fn provision_in(template_root: &Path, parent: &Path) -> Result<Self> {
        if !template_root.is_dir() {
            return Err(Error::path_resolution(
                template_root,
                "template root is not a directory",
            ));
        }

        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| Error::Provision {
                message: format!("cannot create directory in {}: {}", parent.display(), e),
            })?;
        let root = dir.path().join(TEMPLATES_DIR);

        let copied = copy_tree(template_root, &root)?;
        info!(
            "Copied {} template files from {} to {}",
            copied,
            template_root.display(),
            root.display()
        );
        Ok(Self { dir, root })
    }

    /// Root of the copied templates.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the copy; generated files go here.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Keep the directory on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let provision_error = |path: &Path, e: &dyn std::fmt::Display| Error::Provision {
        message: format!("{}: {}", path.display(), e),
    };

    let mut copied = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| provision_error(source, &e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| provision_error(entry.path(), &e))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).map_err(|e| provision_error(&destination, &e))?;
        } else {
            fs::copy(entry.path(), &destination).map_err(|e| provision_error(entry.path(), &e))?;
            debug!("Copied {}", relative.display());
            copied += 1;
        }
    }
    Ok(copied)
}
