use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::manifest::types::Dependency;
use crate::version::types::{ChartIndex, VersionCandidate};

/// In-memory, TTL-bounded store of fetched version catalogs.
///
/// Two independent maps keyed by normalized repository URL: one for
/// traditional-repository index documents, one for registry tag lists.
/// Entries older than the TTL are treated as absent. Values are immutable
/// once stored, so overwriting on a refetch race is safe. Created once per
/// run and discarded at run end; `clear()` exists for test isolation.
pub struct CatalogCache {
    ttl: Duration,
    index: Mutex<HashMap<String, CacheEntry<ChartIndex>>>,
    tags: Mutex<HashMap<String, CacheEntry<Vec<VersionCandidate>>>>,
}

struct CacheEntry<T> {
    stored_at: Instant,
    value: T,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            index: Mutex::new(HashMap::new()),
            tags: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached index document for a repository, unless expired
    pub fn get_index(&self, repository: &str) -> Option<ChartIndex> {
        let guard = lock(&self.index);
        self.fresh(guard.get(&normalize_repo_url(repository)))
    }

    pub fn store_index(&self, repository: &str, index: ChartIndex) {
        let key = normalize_repo_url(repository);
        debug!(repository = %key, charts = index.len(), "caching index document");
        lock(&self.index).insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value: index,
            },
        );
    }

    /// Get the cached tag list for one chart of a registry, unless expired
    pub fn get_tags(&self, repository: &str, chart_name: &str) -> Option<Vec<VersionCandidate>> {
        let guard = lock(&self.tags);
        self.fresh(guard.get(&tags_key(repository, chart_name)))
    }

    pub fn store_tags(&self, repository: &str, chart_name: &str, tags: Vec<VersionCandidate>) {
        let key = tags_key(repository, chart_name);
        debug!(repository = %key, count = tags.len(), "caching tag list");
        lock(&self.tags).insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value: tags,
            },
        );
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        lock(&self.index).clear();
        lock(&self.tags).clear();
    }

    fn fresh<T: Clone>(&self, entry: Option<&CacheEntry<T>>) -> Option<T> {
        let entry = entry?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }
}

// Cached values are only ever inserted whole, so a poisoned lock cannot
// expose a half-written entry.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn tags_key(repository: &str, chart_name: &str) -> String {
    format!("{}/{}", normalize_repo_url(repository), chart_name)
}

/// Normalize a repository URL for use as a cache key: trailing slashes
/// trimmed, scheme and host lowercased (the path keeps its case).
pub fn normalize_repo_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    match url.find("://") {
        Some(scheme_end) => {
            let after_scheme = scheme_end + 3;
            let host_end = url[after_scheme..]
                .find('/')
                .map(|i| after_scheme + i)
                .unwrap_or(url.len());
            format!(
                "{}{}",
                url[..host_end].to_ascii_lowercase(),
                &url[host_end..]
            )
        }
        None => url.to_string(),
    }
}

/// Catalog identity of one dependency: normalized repository plus chart name
pub fn catalog_key(dependency: &Dependency) -> String {
    format!(
        "{}/{}",
        normalize_repo_url(&dependency.repository),
        dependency.chart_name
    )
}
