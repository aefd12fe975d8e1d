//! Common types for manifest handling

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::manifest::path::StructuralPath;
use crate::version::types::VersionUpdate;

/// Kind of repository a chart reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    /// Traditional Helm repository serving an index.yaml
    Helm,
    /// OCI registry serving the distribution tags API
    Oci,
}

impl RepoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoKind::Helm => "helm",
            RepoKind::Oci => "oci",
        }
    }
}

impl std::str::FromStr for RepoKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "helm" => Ok(RepoKind::Helm),
            "oci" => Ok(RepoKind::Oci),
            _ => Err(()),
        }
    }
}

/// A single chart reference found in a manifest.
///
/// Immutable once extracted; produced by the external extraction
/// collaborator and handed over as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// File the reference lives in
    pub manifest_path: PathBuf,
    /// Zero-based document index within a multi-document file
    #[serde(default)]
    pub document_index: usize,
    pub chart_name: String,
    /// Repository location (https URL or oci:// reference)
    pub repository: String,
    pub repo_kind: RepoKind,
    pub current_version: String,
    /// Location of the version field inside the parsed document
    pub version_path: StructuralPath,
}

/// Result of mutating one manifest file.
///
/// Produced only when the mutated text differs from the original.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub original: String,
    pub mutated: String,
    /// Updates that changed the text, in application order
    pub applied: Vec<VersionUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("helm", Ok(RepoKind::Helm))]
    #[case("oci", Ok(RepoKind::Oci))]
    #[case("git", Err(()))]
    fn repo_kind_round_trips_through_str(#[case] input: &str, #[case] expected: Result<RepoKind, ()>) {
        assert_eq!(input.parse::<RepoKind>(), expected);
        if let Ok(kind) = expected {
            assert_eq!(kind.as_str(), input);
        }
    }

    #[test]
    fn dependency_deserializes_from_extractor_hand_off() {
        let yaml = r#"
manifestPath: apps/prometheus.yaml
documentIndex: 0
chartName: prometheus
repository: https://prometheus-community.github.io/helm-charts
repoKind: helm
currentVersion: "15.9.0"
versionPath: [spec, source, targetRevision]
"#;
        let dep: Dependency = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(dep.chart_name, "prometheus");
        assert_eq!(dep.repo_kind, RepoKind::Helm);
        assert_eq!(
            dep.version_path.segments(),
            &["spec", "source", "targetRevision"]
        );
    }
}
