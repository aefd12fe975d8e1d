//! Common types for version resolution

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::manifest::types::Dependency;
use crate::version::semver::BumpKind;

/// One version known to exist in a repository's catalog
#[derive(Debug, Clone, PartialEq)]
pub struct VersionCandidate {
    /// Version string as published (may carry a 'v' prefix)
    pub version: String,
    /// Release creation time, when the source reports one
    pub created: Option<DateTime<Utc>>,
    /// Content digest of the packaged chart, when the source reports one
    pub digest: Option<String>,
}

impl VersionCandidate {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            created: None,
            digest: None,
        }
    }
}

/// Parsed index of a traditional repository: chart name -> known versions
pub type ChartIndex = HashMap<String, Vec<VersionCandidate>>;

/// Decision to move one dependency to a new version.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionUpdate {
    pub dependency: Dependency,
    pub current_version: String,
    pub new_version: String,
    pub bump: BumpKind,
    /// Release-notes reference, filled in by the changelog collaborator
    pub release_url: Option<String>,
}
