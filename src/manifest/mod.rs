//! Manifest mutation layer
//!
//! Locates a version field inside a GitOps manifest by structural path and
//! rewrites only that value, leaving every other byte of the file untouched
//! (comments, key order, indentation, quoting). The parsed representation is
//! used for existence checks and post-edit validation only; the file is
//! never re-serialized through it.
//!
//! # Modules
//!
//! - [`types`]: `Dependency`, `RepoKind`, `FileDiff`
//! - [`path`]: structural paths and navigation over parsed documents
//! - [`locator`]: maps a structural path to the exact source line
//! - [`mutator`]: rewrites the value portion of one line
//! - [`orchestrator`]: per-file batching, validation, diff records
//! - [`error`]: error types for the mutation path

pub mod error;
pub mod locator;
pub mod mutator;
pub mod orchestrator;
pub mod path;
pub mod types;

use serde::Deserialize;
use serde_yaml::Value;

/// Parse every document of a (possibly multi-document) YAML file
pub fn parse_documents(text: &str) -> Result<Vec<Value>, serde_yaml::Error> {
    let mut documents = Vec::new();
    for de in serde_yaml::Deserializer::from_str(text) {
        documents.push(Value::deserialize(de)?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_documents_splits_multi_document_files() {
        let docs = parse_documents("a: 1\n---\nb: 2\n").unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["b"], Value::from(2));
    }

    #[test]
    fn parse_documents_handles_leading_separator() {
        let docs = parse_documents("---\na: 1\n").unwrap();
        assert_eq!(docs.len(), 1);
    }
}
