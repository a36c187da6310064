//! Path classification utilities for undercloud
//!
//! Classification is purely lexical. Paths are made absolute and normalized
//! (`.` dropped, `..` applied, separators collapsed) but symlinks are never
//! resolved, so a template tree reached through a bind mount classifies by
//! the path the operator typed.

use std::path::{Component, Path, PathBuf};

/// Result of classifying a path against a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The path lies inside the root; holds the path relative to it.
    ///
    /// The relative path is empty when the path is the root itself.
    InRoot(PathBuf),
    /// The path lies outside the root.
    NotInRoot,
}

impl Classification {
    pub fn is_in_root(&self) -> bool {
        matches!(self, Classification::InRoot(_))
    }
}

/// Lexically normalize a path.
///
/// `..` at the filesystem root is dropped, matching what the kernel does.
/// For relative paths, leading `..` components are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Make `path` absolute by joining it onto `base` when relative, then normalize.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Expand a leading `~` or `~/` to the given home directory.
///
/// `~user` forms are left untouched.
pub fn expand_user(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path == "~" => home.to_path_buf(),
        Some(home) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Classify `path` against `root`.
///
/// Both sides are normalized first. Matching is done per path component, so a
/// sibling directory sharing a textual prefix (`/tmp/thtroot42` next to
/// `/tmp/thtroot`) is never considered inside the root. A relative `path` is
/// never inside an absolute `root`; callers absolutize user input first.
pub fn classify(path: &Path, root: &Path) -> Classification {
    let path = normalize(path);
    let root = normalize(root);
    match path.strip_prefix(&root) {
        Ok(relative) => Classification::InRoot(relative.to_path_buf()),
        Err(_) => Classification::NotInRoot,
    }
}
