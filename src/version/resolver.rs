//! Resolves version catalogs for a set of dependencies and decides updates.
//!
//! Fetch jobs are deduplicated (one index document per repository, one tag
//! list per chart) and issued with a bounded concurrent fan-out. A failed
//! fetch is logged and leaves that repository's dependencies without a
//! catalog for the run; it never aborts the others.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, warn};

use crate::config::{MAX_CONCURRENT_FETCHES, UpdaterConfig};
use crate::manifest::types::{Dependency, RepoKind};
use crate::version::cache::{CatalogCache, catalog_key, normalize_repo_url};
use crate::version::registry::SourceFetcher;
use crate::version::selector::select_update;
use crate::version::types::{VersionCandidate, VersionUpdate};

enum FetchJob {
    Index(String),
    Tags(String, String),
}

pub struct VersionResolver<S> {
    sources: S,
    cache: CatalogCache,
    config: UpdaterConfig,
}

impl<S: SourceFetcher> VersionResolver<S> {
    pub fn new(sources: S, config: UpdaterConfig) -> Self {
        let cache = CatalogCache::new(Duration::from_secs(config.cache.ttl_seconds));
        Self {
            sources,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Fetch (or reuse cached) catalogs for every repository the
    /// dependencies reference, keyed by normalized repository plus chart
    /// name.
    pub async fn resolve_versions(
        &self,
        dependencies: &[Dependency],
    ) -> HashMap<String, Vec<VersionCandidate>> {
        let mut jobs = Vec::new();
        let mut seen = HashSet::new();
        for dep in dependencies {
            let repo = normalize_repo_url(&dep.repository);
            match dep.repo_kind {
                RepoKind::Helm => {
                    if seen.insert(repo.clone()) {
                        jobs.push(FetchJob::Index(repo));
                    }
                }
                RepoKind::Oci => {
                    if seen.insert(catalog_key(dep)) {
                        jobs.push(FetchJob::Tags(repo, dep.chart_name.clone()));
                    }
                }
            }
        }

        futures::stream::iter(jobs)
            .for_each_concurrent(MAX_CONCURRENT_FETCHES, |job| self.run_job(job))
            .await;

        let mut catalogs = HashMap::new();
        for dep in dependencies {
            let key = catalog_key(dep);
            if catalogs.contains_key(&key) {
                continue;
            }
            let catalog = match dep.repo_kind {
                RepoKind::Helm => self.cache.get_index(&dep.repository).and_then(|index| {
                    let found = index.get(&dep.chart_name).cloned();
                    if found.is_none() {
                        debug!(
                            chart = %dep.chart_name,
                            repository = %dep.repository,
                            "chart not present in index document"
                        );
                    }
                    found
                }),
                RepoKind::Oci => self.cache.get_tags(&dep.repository, &dep.chart_name),
            };
            if let Some(catalog) = catalog {
                catalogs.insert(key, catalog);
            }
        }
        catalogs
    }

    /// Decide an update for every dependency with a usable catalog
    pub async fn check_for_updates(&self, dependencies: &[Dependency]) -> Vec<VersionUpdate> {
        let catalogs = self.resolve_versions(dependencies).await;

        dependencies
            .iter()
            .filter_map(|dep| {
                let catalog = catalogs.get(&catalog_key(dep))?;
                select_update(dep, catalog, self.config.strategy, &self.config.ignore)
            })
            .collect()
    }

    async fn run_job(&self, job: FetchJob) {
        match job {
            FetchJob::Index(repo) => {
                if self.cache.get_index(&repo).is_some() {
                    return;
                }
                let credential = self.config.credential_for(&repo).cloned();
                match self.sources.fetch_index(&repo, credential).await {
                    Ok(index) => self.cache.store_index(&repo, index),
                    Err(e) => {
                        warn!(repository = %repo, error = %e, "failed to fetch index document")
                    }
                }
            }
            FetchJob::Tags(repo, chart) => {
                if self.cache.get_tags(&repo, &chart).is_some() {
                    return;
                }
                let credential = self.config.credential_for(&repo).cloned();
                match self.sources.fetch_tags(&repo, &chart, credential).await {
                    Ok(tags) => self.cache.store_tags(&repo, &chart, tags),
                    Err(e) => {
                        warn!(repository = %repo, chart = %chart, error = %e, "failed to fetch tag list")
                    }
                }
            }
        }
    }
}
