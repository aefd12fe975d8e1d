//! Structural paths into parsed YAML documents
//!
//! A path is an ordered sequence of segments, each either an object key or
//! an array index (encoded as a decimal string to keep the sequence
//! homogeneous). Navigating a valid path through the parsed document
//! resolves to exactly one scalar: the version string.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuralPath(Vec<String>);

impl StructuralPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Build a path from a dotted string, e.g. "spec.source.targetRevision"
    pub fn from_dotted(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk the document tree along this path.
    ///
    /// Mapping nodes are entered by key, sequence nodes by parsing the
    /// segment as an index. Returns `None` as soon as a segment does not
    /// fit the node it meets.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut node = document;
        for segment in &self.0 {
            node = match node {
                Value::Mapping(map) => map.get(segment.as_str())?,
                Value::Sequence(seq) => seq.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Resolve the path and require the target to be a scalar
    pub fn resolve_scalar<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let node = self.resolve(document)?;
        match node {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(node),
            _ => None,
        }
    }
}

impl std::fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn document() -> Value {
        serde_yaml::from_str(
            r#"
spec:
  sources:
    - repoURL: https://charts.example.com
      chart: prometheus
      targetRevision: 15.9.0
    - repoURL: https://other.example.com
      chart: grafana
      targetRevision: 6.0.0
  destination:
    namespace: monitoring
"#,
        )
        .unwrap()
    }

    #[rstest]
    #[case(&["spec", "sources", "0", "targetRevision"], Some("15.9.0"))]
    #[case(&["spec", "sources", "1", "chart"], Some("grafana"))]
    #[case(&["spec", "destination", "namespace"], Some("monitoring"))]
    #[case(&["spec", "sources", "2", "chart"], None)] // index out of range
    #[case(&["spec", "missing"], None)]
    #[case(&["spec", "sources", "chart"], None)] // key segment against a sequence
    fn resolve_walks_keys_and_indices(#[case] segments: &[&str], #[case] expected: Option<&str>) {
        let path = StructuralPath::new(segments.iter().map(|s| s.to_string()).collect());
        let doc = document();

        let value = path.resolve(&doc).and_then(|v| v.as_str());
        assert_eq!(value, expected);
    }

    #[test]
    fn resolve_scalar_rejects_non_scalar_targets() {
        let doc = document();

        assert!(
            StructuralPath::from_dotted("spec.sources")
                .resolve_scalar(&doc)
                .is_none()
        );
        assert!(
            StructuralPath::from_dotted("spec.sources.0.targetRevision")
                .resolve_scalar(&doc)
                .is_some()
        );
    }

    #[test]
    fn from_dotted_splits_segments() {
        let path = StructuralPath::from_dotted("spec.source.targetRevision");
        assert_eq!(path.segments(), &["spec", "source", "targetRevision"]);
        assert_eq!(path.to_string(), "spec.source.targetRevision");
    }
}
