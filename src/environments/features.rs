//! Feature environment table
//!
//! Optional undercloud services are switched on by appending their
//! environment files. The table below is the single place that maps a feature
//! onto its files. It is walked in declaration order, so the relative order
//! of feature files never depends on the order the flags were given in.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

/// An optional feature that contributes environment files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Major upgrade of a containerized undercloud
    Upgrade,
    /// Bare metal provisioning
    Ironic,
    /// Hardware introspection
    IronicInspector,
    /// Workflow service
    Mistral,
    /// Messaging service
    Zaqar,
    /// Web UI
    Ui,
    /// TLS on public endpoints
    Tls,
    /// HAProxy and keepalived in front of the services
    Ha,
    /// Containerized services
    Docker,
}

/// Ordered feature table: feature -> files relative to the template root.
pub const FEATURE_TABLE: &[(Feature, &[&str])] = &[
    (
        Feature::Upgrade,
        &["environments/major-upgrade-composable-steps-docker.yaml"],
    ),
    (Feature::Ironic, &["environments/services-docker/ironic.yaml"]),
    (
        Feature::IronicInspector,
        &["environments/services-docker/ironic-inspector.yaml"],
    ),
    (Feature::Mistral, &["environments/services-docker/mistral.yaml"]),
    (Feature::Zaqar, &["environments/services-docker/zaqar.yaml"]),
    (Feature::Ui, &["environments/services-docker/tripleo-ui.yaml"]),
    (
        Feature::Tls,
        &[
            "environments/public-tls-undercloud.yaml",
            "environments/tls-endpoints-public-ip.yaml",
        ],
    ),
    (
        Feature::Ha,
        &[
            "environments/use-dns-for-vips.yaml",
            "environments/services-docker/undercloud-haproxy.yaml",
            "environments/services-docker/undercloud-keepalived.yaml",
        ],
    ),
    (Feature::Docker, &["environments/docker.yaml"]),
];

/// The set of enabled features
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: BTreeSet<Feature>,
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, feature: Feature) -> &mut Self {
        self.enabled.insert(feature);
        self
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }

    /// Files contributed by the enabled features, joined onto `root`, in
    /// table order.
    pub fn files(&self, root: &Path) -> Vec<(Feature, PathBuf)> {
        FEATURE_TABLE
            .iter()
            .filter(|(feature, _)| self.is_enabled(*feature))
            .flat_map(|(feature, suffixes)| suffixes.iter().map(move |s| (*feature, root.join(s))))
            .collect()
    }
}

impl FromIterator<Feature> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_feature_once() {
        for feature in Feature::value_variants() {
            let count = FEATURE_TABLE.iter().filter(|(f, _)| f == feature).count();
            assert_eq!(count, 1, "{:?} should appear exactly once", feature);
        }
    }

    #[test]
    fn test_files_follow_table_order_not_flag_order() {
        let a: FeatureFlags = [Feature::Docker, Feature::Ha, Feature::Ironic]
            .into_iter()
            .collect();
        let b: FeatureFlags = [Feature::Ironic, Feature::Docker, Feature::Ha]
            .into_iter()
            .collect();
        let root = Path::new("/twd/templates");
        assert_eq!(a.files(root), b.files(root));

        let files: Vec<PathBuf> = a.files(root).into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/twd/templates/environments/services-docker/ironic.yaml"),
                PathBuf::from("/twd/templates/environments/use-dns-for-vips.yaml"),
                PathBuf::from("/twd/templates/environments/services-docker/undercloud-haproxy.yaml"),
                PathBuf::from(
                    "/twd/templates/environments/services-docker/undercloud-keepalived.yaml"
                ),
                PathBuf::from("/twd/templates/environments/docker.yaml"),
            ]
        );
    }

    #[test]
    fn test_no_features_no_files() {
        assert!(FeatureFlags::new().files(Path::new("/t")).is_empty());
    }

    #[test]
    fn test_enable_chains() {
        let mut flags = FeatureFlags::new();
        flags.enable(Feature::Tls).enable(Feature::Ui);
        assert!(flags.is_enabled(Feature::Tls));
        assert!(flags.is_enabled(Feature::Ui));
        assert!(!flags.is_enabled(Feature::Ha));
    }

    #[test]
    fn test_feature_value_names() {
        assert_eq!(
            Feature::IronicInspector
                .to_possible_value()
                .unwrap()
                .get_name(),
            "ironic-inspector"
        );
    }
}
