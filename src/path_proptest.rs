//! Property-based tests for path classification and redirection.
//!
//! These tests use proptest to generate random path segments and verify that
//! the classification and redirection invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::path::{Path, PathBuf};

    use crate::path::{classify, normalize, Classification};
    use crate::redirect::TemplateRedirector;
    use proptest::prelude::*;

    const TEMPLATE_ROOT: &str = "/tmp/thtroot";
    const WORKING_ROOT: &str = "/twd/templates";

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,12}(\\.yaml)?"
    }

    fn relative_path() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec(segment(), 1..6).prop_map(|parts| parts.iter().collect())
    }

    fn noisy_relative_path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                4 => segment(),
                1 => Just(".".to_string()),
                1 => Just(String::new()),
            ],
            1..8,
        )
        .prop_map(|parts| parts.join("/"))
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(rest in noisy_relative_path()) {
            let path = PathBuf::from(format!("/{}", rest));
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Property: a segment followed by `..` cancels out
        #[test]
        fn normalize_cancels_parent_dir(base in relative_path(), extra in segment()) {
            let root = Path::new("/").join(&base);
            let detour = root.join(&extra).join("..");
            prop_assert_eq!(normalize(&detour), normalize(&root));
        }
    }

    // ============================================================================
    // classify property tests
    // ============================================================================

    proptest! {
        /// Property: any relative path joined onto the root is inside it, and
        /// the relative part is recovered exactly
        #[test]
        fn classify_recovers_relative_part(relative in relative_path()) {
            let path = Path::new(TEMPLATE_ROOT).join(&relative);
            prop_assert_eq!(
                classify(&path, Path::new(TEMPLATE_ROOT)),
                Classification::InRoot(relative)
            );
        }

        /// Property: a sibling directory sharing the root's name as a prefix is
        /// never inside the root
        #[test]
        fn classify_rejects_textual_prefix_siblings(
            suffix in "[a-z0-9]{1,6}",
            relative in relative_path(),
        ) {
            let sibling = PathBuf::from(format!("{}{}", TEMPLATE_ROOT, suffix)).join(relative);
            prop_assert_eq!(
                classify(&sibling, Path::new(TEMPLATE_ROOT)),
                Classification::NotInRoot
            );
        }

        /// Property: extra separators and `.` components do not change the outcome
        #[test]
        fn classify_ignores_separator_noise(rest in noisy_relative_path()) {
            let noisy = PathBuf::from(format!("{}//./{}", TEMPLATE_ROOT, rest));
            prop_assert!(classify(&noisy, Path::new(TEMPLATE_ROOT)).is_in_root());
        }
    }

    // ============================================================================
    // redirect property tests
    // ============================================================================

    proptest! {
        /// Property: redirecting twice gives the same result as redirecting once
        #[test]
        fn redirect_is_idempotent(relative in relative_path()) {
            let redirector = TemplateRedirector::new(TEMPLATE_ROOT, WORKING_ROOT);
            let once = redirector.redirect(&Path::new(TEMPLATE_ROOT).join(&relative));
            prop_assert_eq!(redirector.redirect(&once), once.clone());
            prop_assert_eq!(once, Path::new(WORKING_ROOT).join(&relative));
        }

        /// Property: redirection stays idempotent when the working copy lives
        /// inside the template tree
        #[test]
        fn redirect_is_idempotent_with_nested_working_root(relative in relative_path()) {
            let nested = format!("{}/.work/templates", TEMPLATE_ROOT);
            let redirector = TemplateRedirector::new(TEMPLATE_ROOT, &nested);
            let once = redirector.redirect(&Path::new(TEMPLATE_ROOT).join(&relative));
            prop_assert_eq!(redirector.redirect(&once), once);
        }

        /// Property: paths outside the template tree are returned unchanged
        #[test]
        fn redirect_leaves_outside_paths_alone(relative in relative_path()) {
            let redirector = TemplateRedirector::new(TEMPLATE_ROOT, WORKING_ROOT);
            let outside = Path::new("/home/stack").join(relative);
            prop_assert_eq!(redirector.redirect(&outside), outside);
        }
    }
}
