//! OCI registry source (distribution tags API)

use serde::Deserialize;

use crate::config::RegistryCredential;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, http_client, with_credential};
use crate::version::types::VersionCandidate;

/// Response from `/v2/<name>/tags/list`
#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    tags: Vec<String>,
}

/// Source for charts published to an OCI registry
pub struct OciSource {
    client: reqwest::Client,
}

impl OciSource {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    /// Fetch the tag list for `<repository>/<chart_name>`.
    ///
    /// `repository` is an `oci://host/path` reference; an explicit
    /// `http://` scheme is honored for registries without TLS.
    pub async fn fetch_tags(
        &self,
        repository: &str,
        chart_name: &str,
        credential: Option<&RegistryCredential>,
    ) -> Result<Vec<VersionCandidate>, RegistryError> {
        let url = tags_url(repository, chart_name);
        let subject = format!("{}/{}", repository.trim_end_matches('/'), chart_name);

        let request = with_credential(self.client.get(&url), credential);
        let response = check_status(request.send().await?, &url, &subject)?;

        let list: TagList = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        Ok(list.tags.into_iter().map(VersionCandidate::new).collect())
    }
}

impl Default for OciSource {
    fn default() -> Self {
        Self::new()
    }
}

fn tags_url(repository: &str, chart_name: &str) -> String {
    let (scheme, rest) = if let Some(rest) = repository.strip_prefix("oci://") {
        ("https", rest)
    } else if let Some(rest) = repository.strip_prefix("http://") {
        ("http", rest)
    } else if let Some(rest) = repository.strip_prefix("https://") {
        ("https", rest)
    } else {
        ("https", repository)
    };

    let rest = rest.trim_matches('/');
    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, path.trim_matches('/')),
        None => (rest, ""),
    };
    let name = if path.is_empty() {
        chart_name.to_string()
    } else {
        format!("{path}/{chart_name}")
    };

    format!("{scheme}://{host}/v2/{name}/tags/list")
}
