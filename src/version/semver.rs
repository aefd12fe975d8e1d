use semver::Version;
use serde::{Deserialize, Serialize};

/// Classification of a version change by its first differing numeric
/// component.
///
/// Ordered so that `Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        }
    }
}

/// Parse a version string into a semver::Version, normalizing partial
/// versions.
///
/// Strips an optional leading 'v' (chart tags are often "v1.2.3") and pads
/// partial versions like "1" or "1.2" with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Classify the bump between a current version and a candidate.
///
/// Returns `None` when all three numeric components are equal, i.e. the
/// versions differ only in pre-release or build metadata; such a change is
/// not an update.
pub fn bump_kind(current: &Version, candidate: &Version) -> Option<BumpKind> {
    if candidate.major != current.major {
        Some(BumpKind::Major)
    } else if candidate.minor != current.minor {
        Some(BumpKind::Minor)
    } else if candidate.patch != current.patch {
        Some(BumpKind::Patch)
    } else {
        None
    }
}
