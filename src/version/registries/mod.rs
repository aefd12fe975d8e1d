//! Concrete version sources (traditional Helm repositories, OCI registries)

mod helm;
mod oci;

pub use helm::HelmRepoSource;
pub use oci::OciSource;

use std::time::Duration;

use reqwest::{RequestBuilder, Response};

use crate::config::{CredentialKind, FETCH_TIMEOUT_SECS, RegistryCredential};
use crate::version::error::RegistryError;

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("chart-updater")
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Attach matched credentials to a request; unmatched repositories are
/// queried unauthenticated.
pub(crate) fn with_credential(
    request: RequestBuilder,
    credential: Option<&RegistryCredential>,
) -> RequestBuilder {
    match credential {
        Some(cred) => match cred.kind {
            CredentialKind::Basic => request.basic_auth(
                cred.username.clone().unwrap_or_default(),
                cred.password.clone(),
            ),
            CredentialKind::Bearer => {
                request.bearer_auth(cred.token.clone().unwrap_or_default())
            }
        },
        None => request,
    }
}

/// Map non-success statuses onto the shared error taxonomy
pub(crate) fn check_status(response: Response, url: &str, subject: &str) -> Result<Response, RegistryError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(subject.to_string()));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RegistryError::AuthFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status {status} from {url}"
        )));
    }

    Ok(response)
}
