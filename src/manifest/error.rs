use std::path::PathBuf;

use thiserror::Error;

/// Failures on the manifest mutation path.
///
/// Recoverable at the granularity of one update or one file; the
/// orchestrator logs and moves on.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document index {index} out of range")]
    DocumentOutOfRange { index: usize },

    #[error("Path {path} does not resolve to a scalar in document {index}")]
    PathNotResolved { path: String, index: usize },

    #[error("No line found for segment {segment:?} of {path}")]
    LineNotFound { path: String, segment: String },

    #[error("Mutated manifest {path} no longer parses: {source}")]
    InvalidAfterEdit {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
