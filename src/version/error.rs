use thiserror::Error;

/// Failures talking to a version source.
///
/// All of these are transient at run granularity: the failing repository's
/// dependencies are skipped and the run continues.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Chart not found: {0}")]
    NotFound(String),

    #[error(
        "Authentication failed for {url} (HTTP {status}); add a credentials entry whose url \
         matches this repository exactly or by prefix, with kind \"basic\" (username/password) \
         or \"bearer\" (token)"
    )]
    AuthFailed { url: String, status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
