//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_minimal_templates();
//!     fixture.command().args(["deploy", "--dry-run"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::templates;
    pub use super::TestFixture;
}

/// Template and environment snippets for testing.
#[allow(dead_code)]
pub mod templates {
    /// Top level stack template.
    pub const OVERCLOUD: &str = "heat_template_version: rocky\nresources: {}\n";

    /// Environment without a resource registry.
    pub const PARAMETERS_ONLY: &str = "parameter_defaults:\n  Debug: true\n";

    /// Resource registry with a relative and a type alias entry.
    pub const RELATIVE_REGISTRY: &str = "resource_registry:\n  \
        OS::TripleO::Services::Foo: ../puppet/services/foo.yaml\n  \
        OS::TripleO::Services::Bar: OS::Heat::None\n";

    /// Malformed YAML.
    pub const INVALID_YAML: &str = "resource_registry: [unclosed";
}

/// A test fixture with a template tree and a home directory.
///
/// The template tree lives under `templates/`, the home directory (which
/// receives password files) under `home/`. Working copies are created under
/// `tmp/`.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_minimal_templates()
///     .with_template("environments/foo.yaml", templates::PARAMETERS_ONLY);
///
/// fixture.command().args(["deploy", "--dry-run"]).assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with empty `templates/`, `home/` and `tmp/`
    /// dirs.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("templates")
            .create_dir_all()
            .expect("Failed to create template dir");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home dir");
        temp_dir
            .child("tmp")
            .create_dir_all()
            .expect("Failed to create tmp dir");
        Self { temp_dir }
    }

    /// Add a file to the template tree.
    pub fn with_template(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("templates")
            .child(path)
            .write_str(content)
            .expect("Failed to write template");
        self
    }

    /// Add the files every deployment references.
    pub fn with_minimal_templates(self) -> Self {
        self.with_template("overcloud.yaml", templates::OVERCLOUD)
            .with_template("overcloud-resource-registry-puppet.yaml", "resource_registry: {}\n")
            .with_template("environments/undercloud.yaml", templates::PARAMETERS_ONLY)
    }

    /// Add a file with the given path relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the fixture root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the template tree.
    pub fn templates(&self) -> PathBuf {
        self.temp_dir.path().join("templates")
    }

    /// Get the path to the home directory.
    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    /// Get the path working copies are created in.
    pub fn tmp(&self) -> PathBuf {
        self.temp_dir.path().join("tmp")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command running in the fixture root with `HOME`, `TMPDIR`,
    /// the template tree and the output directory pointing into the fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("undercloud");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("UNDERCLOUD_TEMPLATES", self.templates())
            .env("UNDERCLOUD_OUTPUT_DIR", self.home())
            .env("TMPDIR", self.tmp())
            .env_remove("UNDERCLOUD_CONF")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_dirs() {
        let fixture = TestFixture::new();
        assert!(fixture.templates().is_dir());
        assert!(fixture.home().is_dir());
    }

    #[test]
    fn test_fixture_with_template() {
        let fixture = TestFixture::new().with_template("environments/a.yaml", "{}\n");
        assert!(fixture.templates().join("environments/a.yaml").exists());
    }

    #[test]
    fn test_snippets_are_valid_yaml() {
        for snippet in [
            templates::OVERCLOUD,
            templates::PARAMETERS_ONLY,
            templates::RELATIVE_REGISTRY,
        ] {
            let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(snippet);
            assert!(parsed.is_ok(), "Invalid snippet: {}", snippet);
        }
    }
}
