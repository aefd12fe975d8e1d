use serde::Deserialize;

use crate::version::cache::normalize_repo_url;
use crate::version::semver::BumpKind;

// =============================================================================
// Time and concurrency constants
// =============================================================================

/// Default lifetime of a cached version catalog in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Timeout for a single catalog fetch in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Upper bound on concurrent catalog fetches to respect registry rate limits
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub strategy: UpdateStrategy,
    pub cache: CacheConfig,
    pub credentials: Vec<RegistryCredential>,
    pub ignore: IgnoreConfig,
    pub groups: Vec<GroupRule>,
}

impl UpdaterConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Find the credential entry for a repository URL.
    ///
    /// Both sides are normalized (trailing slashes trimmed, scheme and host
    /// lowercased) before comparison, so an entry matches however its URL
    /// was written. An exact match wins; otherwise the entry with the
    /// longest URL prefix match is used. Repositories without a match are
    /// queried unauthenticated.
    pub fn credential_for(&self, repository: &str) -> Option<&RegistryCredential> {
        let repository = normalize_repo_url(repository);
        if let Some(exact) = self
            .credentials
            .iter()
            .find(|c| normalize_repo_url(&c.url) == repository)
        {
            return Some(exact);
        }

        self.credentials
            .iter()
            .filter(|c| repository.starts_with(&normalize_repo_url(&c.url)))
            .max_by_key(|c| normalize_repo_url(&c.url).len())
    }
}

/// Which bump kinds an update run is allowed to adopt.
///
/// A strategy names the maximum bump kind it permits; `all` permits every
/// kind.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStrategy {
    Major,
    Minor,
    Patch,
    #[default]
    All,
}

impl UpdateStrategy {
    pub fn permits(self, bump: BumpKind) -> bool {
        match self {
            UpdateStrategy::All | UpdateStrategy::Major => true,
            UpdateStrategy::Minor => bump <= BumpKind::Minor,
            UpdateStrategy::Patch => bump == BumpKind::Patch,
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Catalog time-to-live in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Authentication entry for one repository (exact URL or URL prefix)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryCredential {
    pub url: String,
    pub kind: CredentialKind,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl Default for RegistryCredential {
    fn default() -> Self {
        Self {
            url: String::new(),
            kind: CredentialKind::Basic,
            username: None,
            password: None,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Basic,
    Bearer,
}

/// Rules that exclude charts or target versions from selection
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IgnoreConfig {
    /// Chart-name glob patterns to skip entirely
    pub charts: Vec<String>,
    /// Version glob patterns, optionally scoped to one bump kind
    pub versions: Vec<VersionIgnoreRule>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionIgnoreRule {
    pub pattern: String,
    /// Bump kind this rule applies to; `None` means any kind
    pub bump: Option<BumpKind>,
}

impl Default for VersionIgnoreRule {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            bump: None,
        }
    }
}

/// Named batch definition for change-request grouping
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupRule {
    pub name: String,
    /// Chart-name glob patterns
    pub patterns: Vec<String>,
    /// Allow-list of bump kinds; `None` admits every kind
    pub bumps: Option<Vec<BumpKind>>,
}

impl Default for GroupRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            patterns: Vec::new(),
            bumps: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn config_from_partial_yaml_uses_defaults_for_missing_fields() {
        let config = UpdaterConfig::from_yaml("strategy: minor\n").unwrap();

        assert_eq!(config.strategy, UpdateStrategy::Minor);
        assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);
        assert!(config.credentials.is_empty());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn config_from_full_yaml_parses_all_fields() {
        let yaml = r#"
strategy: patch
cache:
  ttlSeconds: 600
credentials:
  - url: https://charts.example.com
    kind: basic
    username: deploy
    password: hunter2
  - url: oci://registry.example.com
    kind: bearer
    token: abc123
ignore:
  charts:
    - "legacy-*"
  versions:
    - pattern: "*-rc*"
    - pattern: "2.*"
      bump: major
groups:
  - name: monitoring
    patterns:
      - "prometheus*"
      - "grafana"
    bumps: [minor, patch]
"#;
        let config = UpdaterConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.strategy, UpdateStrategy::Patch);
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.credentials.len(), 2);
        assert_eq!(config.credentials[1].kind, CredentialKind::Bearer);
        assert_eq!(config.ignore.charts, vec!["legacy-*".to_string()]);
        assert_eq!(config.ignore.versions[1].bump, Some(BumpKind::Major));
        assert_eq!(config.groups[0].name, "monitoring");
        assert_eq!(
            config.groups[0].bumps,
            Some(vec![BumpKind::Minor, BumpKind::Patch])
        );
    }

    #[rstest]
    #[case(UpdateStrategy::All, BumpKind::Major, true)]
    #[case(UpdateStrategy::Major, BumpKind::Major, true)]
    #[case(UpdateStrategy::Major, BumpKind::Patch, true)]
    #[case(UpdateStrategy::Minor, BumpKind::Major, false)]
    #[case(UpdateStrategy::Minor, BumpKind::Minor, true)]
    #[case(UpdateStrategy::Minor, BumpKind::Patch, true)]
    #[case(UpdateStrategy::Patch, BumpKind::Minor, false)]
    #[case(UpdateStrategy::Patch, BumpKind::Patch, true)]
    fn strategy_permits_expected_bump_kinds(
        #[case] strategy: UpdateStrategy,
        #[case] bump: BumpKind,
        #[case] expected: bool,
    ) {
        assert_eq!(strategy.permits(bump), expected);
    }

    fn credential(url: &str) -> RegistryCredential {
        RegistryCredential {
            url: url.to_string(),
            ..RegistryCredential::default()
        }
    }

    #[test]
    fn credential_for_prefers_exact_match_over_prefix() {
        let config = UpdaterConfig {
            credentials: vec![
                credential("https://charts.example.com"),
                credential("https://charts.example.com/stable"),
            ],
            ..UpdaterConfig::default()
        };

        let found = config
            .credential_for("https://charts.example.com/stable")
            .unwrap();
        assert_eq!(found.url, "https://charts.example.com/stable");
    }

    #[test]
    fn credential_for_uses_longest_prefix_match() {
        let config = UpdaterConfig {
            credentials: vec![
                credential("https://charts.example.com"),
                credential("https://charts.example.com/team"),
            ],
            ..UpdaterConfig::default()
        };

        let found = config
            .credential_for("https://charts.example.com/team/apps")
            .unwrap();
        assert_eq!(found.url, "https://charts.example.com/team");
    }

    #[rstest]
    #[case("https://charts.example.com/", "https://charts.example.com")]
    #[case("https://charts.example.com", "https://charts.example.com/")]
    #[case("HTTPS://Charts.Example.COM", "https://charts.example.com")]
    #[case("https://charts.example.com/", "https://charts.example.com/stable/app")]
    fn credential_for_matches_regardless_of_slash_or_host_case(
        #[case] entry_url: &str,
        #[case] repository: &str,
    ) {
        let config = UpdaterConfig {
            credentials: vec![credential(entry_url)],
            ..UpdaterConfig::default()
        };

        // The resolver looks credentials up by normalized repository URL.
        let normalized = normalize_repo_url(repository);
        assert!(config.credential_for(&normalized).is_some());
        assert!(config.credential_for(repository).is_some());
    }

    #[test]
    fn credential_for_returns_none_without_match() {
        let config = UpdaterConfig {
            credentials: vec![credential("https://charts.example.com")],
            ..UpdaterConfig::default()
        };

        assert!(config.credential_for("https://other.example.com").is_none());
    }
}
