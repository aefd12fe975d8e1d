//! Facade tying resolution, selection, grouping, and manifest mutation
//! together.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::{GroupRule, UpdaterConfig};
use crate::manifest::orchestrator::update_manifests;
use crate::manifest::types::{Dependency, FileDiff};
use crate::version::grouper::group_updates;
use crate::version::registry::RemoteSources;
use crate::version::resolver::VersionResolver;
use crate::version::types::{VersionCandidate, VersionUpdate};

pub struct UpdateEngine {
    groups: Vec<GroupRule>,
    resolver: VersionResolver<RemoteSources>,
}

impl UpdateEngine {
    pub fn new(config: UpdaterConfig) -> Self {
        let groups = config.groups.clone();
        Self {
            groups,
            resolver: VersionResolver::new(RemoteSources::new(), config),
        }
    }

    /// Version catalogs for every repository the dependencies reference
    pub async fn resolve_versions(
        &self,
        dependencies: &[Dependency],
    ) -> HashMap<String, Vec<VersionCandidate>> {
        self.resolver.resolve_versions(dependencies).await
    }

    /// Decide which dependencies have an applicable newer version
    pub async fn check_for_updates(&self, dependencies: &[Dependency]) -> Vec<VersionUpdate> {
        self.resolver.check_for_updates(dependencies).await
    }

    /// Cluster updates into the configured change-request batches
    pub fn group_updates(&self, updates: Vec<VersionUpdate>) -> IndexMap<String, Vec<VersionUpdate>> {
        group_updates(updates, &self.groups)
    }

    /// Rewrite the manifests behind the updates, one diff per touched file
    pub fn update_manifests(&self, updates: &[VersionUpdate]) -> Vec<FileDiff> {
        update_manifests(updates)
    }

    /// Drop all cached catalogs so the next run refetches
    pub fn clear_cache(&self) {
        self.resolver.cache().clear();
    }
}
