//! # Password Merging
//!
//! The undercloud keeps its service secrets in two files in the operator's
//! home directory:
//!
//! - `tripleo-undercloud-passwords.yaml`: a Heat environment of the form
//!   `{parameter_defaults: {Name: secret}}`, submitted with every deployment.
//! - `undercloud-passwords.conf`: the legacy INI file (`[auth]` section) kept
//!   for tooling that predates the Heat based installer.
//!
//! Both are views of one canonical [`PasswordSet`]. Each run generates a
//! fresh default set, then layers in what is already persisted and finally
//! the caller's overrides:
//!
//! ```text
//! generated  <-  existing structured  <-  existing legacy  <-  overrides
//! ```
//!
//! so a secret that was persisted once is never regenerated, and an explicit
//! override always wins. Both files end up readable by their owner only.
//!
//! Concurrent runs against the same directory are not coordinated; the last
//! writer wins.

pub mod generate;
pub mod legacy;
pub mod structured;

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

pub use generate::{PasswordGenerator, RandomPasswordGenerator};

/// Password name -> secret, ordered by name for stable output
pub type PasswordSet = BTreeMap<String, String>;

/// File name of the structured (Heat environment) passwords file
pub const STRUCTURED_FILE_NAME: &str = "tripleo-undercloud-passwords.yaml";

/// File name of the legacy INI passwords file
pub const LEGACY_FILE_NAME: &str = "undercloud-passwords.conf";

/// Path of the structured passwords file in `dir`.
pub fn structured_path(dir: &Path) -> PathBuf {
    dir.join(STRUCTURED_FILE_NAME)
}

/// Path of the legacy passwords file in `dir`.
pub fn legacy_path(dir: &Path) -> PathBuf {
    dir.join(LEGACY_FILE_NAME)
}

/// Merge generated, persisted and override passwords and persist the result.
///
/// An existing legacy file keeps its content; only its mode is normalized.
/// A missing one is created from the merged set.
///
/// # Errors
///
/// - `Error::Parse` if an existing password file is malformed.
/// - `Error::Persistence` if either file cannot be written or restricted.
/// - `Error::PasswordGeneration` if the generator fails.
pub fn merge_passwords(
    target_dir: &Path,
    overrides: &PasswordSet,
    generator: &dyn PasswordGenerator,
) -> Result<PasswordSet> {
    fs::create_dir_all(target_dir).map_err(|e| Error::persistence(target_dir, e))?;
    let structured_file = structured_path(target_dir);
    let legacy_file = legacy_path(target_dir);

    let mut merged = generator.generate()?;
    debug!("Generated {} default passwords", merged.len());

    if let Some(existing) = structured::load(&structured_file)? {
        debug!(
            "Keeping {} passwords from {}",
            existing.len(),
            structured_file.display()
        );
        merged.extend(existing);
    }

    let legacy_exists = legacy_file.exists();
    if legacy_exists {
        let existing = legacy::load(&legacy_file)?;
        debug!(
            "Keeping {} passwords from {}",
            existing.len(),
            legacy_file.display()
        );
        merged.extend(existing);
    }

    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

    structured::write(&structured_file, &merged)?;

    if legacy_exists {
        restrict_to_owner(&legacy_file)?;
    } else {
        legacy::write(&legacy_file, &merged)?;
    }

    info!(
        "Stored {} passwords in {}",
        merged.len(),
        structured_file.display()
    );
    Ok(merged)
}

/// Open `path` for a full rewrite, readable by its owner only.
///
/// A new file is created with mode 0600 and an existing one is restricted
/// before any content is written to it.
pub(crate) fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path).map_err(|e| Error::persistence(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::persistence(path, e))?;
    }
    Ok(file)
}

/// Set mode 0600 on `path`.
pub fn restrict_to_owner(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::persistence(path, e))?;
    }
    #[cfg(not(unix))]
    {
        if !path.exists() {
            return Err(Error::persistence(path, "file does not exist"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn set(pairs: &[(&str, &str)]) -> PasswordSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mode(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_merge_passwords_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let generated = set(&[("GeneratedPassword", "123")]);

        let merged = merge_passwords(temp.path(), &PasswordSet::new(), &generated).unwrap();
        assert_eq!(merged, generated);

        let structured_file = structured_path(temp.path());
        let legacy_file = legacy_path(temp.path());
        assert_eq!(structured::load(&structured_file).unwrap(), Some(generated));
        assert!(legacy_file.exists());
        assert_eq!(mode(&structured_file), 0o600);
        assert_eq!(mode(&legacy_file), 0o600);
    }

    #[test]
    fn test_merge_passwords_existing_files() {
        let temp = TempDir::new().unwrap();
        let structured_file = structured_path(temp.path());
        let legacy_file = legacy_path(temp.path());
        fs::write(&structured_file, "parameter_defaults: {ExistingKey: xyz}\n").unwrap();
        fs::write(&legacy_file, "[auth]\nundercloud_db_password = abc\n").unwrap();
        fs::set_permissions(&legacy_file, fs::Permissions::from_mode(0o644)).unwrap();

        let generated = set(&[("GeneratedPassword", "123"), ("ExistingKey", "fresh")]);
        let overrides = set(&[("ADefault", "456")]);
        let merged = merge_passwords(temp.path(), &overrides, &generated).unwrap();

        assert_eq!(
            merged,
            set(&[
                ("GeneratedPassword", "123"),
                ("ExistingKey", "xyz"),
                ("MysqlRootPassword", "abc"),
                ("ADefault", "456"),
            ])
        );
        assert_eq!(structured::load(&structured_file).unwrap(), Some(merged));
        assert_eq!(
            fs::read_to_string(&legacy_file).unwrap(),
            "[auth]\nundercloud_db_password = abc\n"
        );
        assert_eq!(mode(&structured_file), 0o600);
        assert_eq!(mode(&legacy_file), 0o600);
    }

    #[test]
    fn test_merge_passwords_precedence() {
        let temp = TempDir::new().unwrap();
        fs::write(
            structured_path(temp.path()),
            "parameter_defaults:\n  B: '9'\n",
        )
        .unwrap();

        let generated = set(&[("A", "1"), ("B", "2")]);
        let overrides = set(&[("A", "5")]);
        let merged = merge_passwords(temp.path(), &overrides, &generated).unwrap();
        assert_eq!(merged, set(&[("A", "5"), ("B", "9")]));
    }

    #[test]
    fn test_override_beats_persisted_value() {
        let temp = TempDir::new().unwrap();
        fs::write(
            structured_path(temp.path()),
            "parameter_defaults:\n  AdminPassword: old\n",
        )
        .unwrap();
        fs::write(
            legacy_path(temp.path()),
            "[auth]\nundercloud_db_password = legacy\n",
        )
        .unwrap();

        let overrides = set(&[("AdminPassword", "new"), ("MysqlRootPassword", "forced")]);
        let merged = merge_passwords(temp.path(), &overrides, &PasswordSet::new()).unwrap();
        assert_eq!(merged.get("AdminPassword").map(String::as_str), Some("new"));
        assert_eq!(
            merged.get("MysqlRootPassword").map(String::as_str),
            Some("forced")
        );
    }

    #[test]
    fn test_second_run_keeps_generated_secrets() {
        let temp = TempDir::new().unwrap();
        let generator = RandomPasswordGenerator::default();
        let first = merge_passwords(temp.path(), &PasswordSet::new(), &generator).unwrap();
        let second = merge_passwords(temp.path(), &PasswordSet::new(), &generator).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_structured_file_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(structured_path(temp.path()), "parameter_defaults: [oops").unwrap();
        let err = merge_passwords(temp.path(), &PasswordSet::new(), &PasswordSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_non_mapping_structured_file_is_kept() {
        let temp = TempDir::new().unwrap();
        let structured_file = structured_path(temp.path());
        fs::write(&structured_file, "- AdminPassword: keepme\n").unwrap();
        let generated = set(&[("AdminPassword", "fresh")]);
        let err = merge_passwords(temp.path(), &PasswordSet::new(), &generated).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(
            fs::read_to_string(&structured_file).unwrap(),
            "- AdminPassword: keepme\n"
        );
    }

    #[test]
    fn test_unwritable_directory_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let err = merge_passwords(&blocker, &PasswordSet::new(), &PasswordSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }
}
