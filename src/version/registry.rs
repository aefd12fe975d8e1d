//! Source trait for fetching chart version catalogs

#[cfg(test)]
use mockall::automock;

use crate::config::RegistryCredential;
use crate::version::error::RegistryError;
use crate::version::registries::{HelmRepoSource, OciSource};
use crate::version::types::{ChartIndex, VersionCandidate};

/// Trait over the two ways chart versions are published.
///
/// Traditional repositories serve one index document covering every chart;
/// OCI registries serve a tag list per chart. The split mirrors the two
/// catalog caches.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch and parse the index document of a traditional repository
    async fn fetch_index(
        &self,
        repository: &str,
        credential: Option<RegistryCredential>,
    ) -> Result<ChartIndex, RegistryError>;

    /// Fetch the tag list for one chart of an OCI registry
    async fn fetch_tags(
        &self,
        repository: &str,
        chart_name: &str,
        credential: Option<RegistryCredential>,
    ) -> Result<Vec<VersionCandidate>, RegistryError>;
}

/// Production fetcher talking to real repositories
pub struct RemoteSources {
    helm: HelmRepoSource,
    oci: OciSource,
}

impl RemoteSources {
    pub fn new() -> Self {
        Self {
            helm: HelmRepoSource::new(),
            oci: OciSource::new(),
        }
    }
}

impl Default for RemoteSources {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SourceFetcher for RemoteSources {
    async fn fetch_index(
        &self,
        repository: &str,
        credential: Option<RegistryCredential>,
    ) -> Result<ChartIndex, RegistryError> {
        self.helm.fetch_index(repository, credential.as_ref()).await
    }

    async fn fetch_tags(
        &self,
        repository: &str,
        chart_name: &str,
        credential: Option<RegistryCredential>,
    ) -> Result<Vec<VersionCandidate>, RegistryError> {
        self.oci
            .fetch_tags(repository, chart_name, credential.as_ref())
            .await
    }
}
