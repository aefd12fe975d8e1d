//! Picks the version a dependency should move to.
//!
//! A candidate survives when it is strictly greater than the current
//! version under semver ordering, its bump kind is permitted by the
//! strategy, and no ignore rule matches. The maximum surviving candidate
//! wins; without one there is no update.

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{IgnoreConfig, UpdateStrategy};
use crate::manifest::types::Dependency;
use crate::version::semver::{bump_kind, parse_version};
use crate::version::types::{VersionCandidate, VersionUpdate};

pub fn select_update(
    dependency: &Dependency,
    catalog: &[VersionCandidate],
    strategy: UpdateStrategy,
    ignore: &IgnoreConfig,
) -> Option<VersionUpdate> {
    let Some(current) = parse_version(&dependency.current_version) else {
        warn!(
            chart = %dependency.chart_name,
            version = %dependency.current_version,
            "current version is not semver; skipping"
        );
        return None;
    };

    if ignore
        .charts
        .iter()
        .any(|pattern| glob_match(pattern, &dependency.chart_name))
    {
        debug!(chart = %dependency.chart_name, "chart matches ignore rule");
        return None;
    }

    let best = catalog
        .iter()
        .filter_map(|candidate| parse_version(&candidate.version).map(|v| (candidate, v)))
        .filter(|(_, version)| *version > current)
        .filter_map(|(candidate, version)| {
            bump_kind(&current, &version).map(|bump| (candidate, version, bump))
        })
        .filter(|(_, _, bump)| strategy.permits(*bump))
        .filter(|(candidate, _, bump)| {
            !ignore.versions.iter().any(|rule| {
                rule.bump.map_or(true, |scoped| scoped == *bump)
                    && glob_match(&rule.pattern, &candidate.version)
            })
        })
        .max_by(|(_, a, _), (_, b, _)| a.cmp(b))?;

    let (candidate, _, bump) = best;
    Some(VersionUpdate {
        dependency: dependency.clone(),
        current_version: dependency.current_version.clone(),
        new_version: candidate.version.clone(),
        bump,
        release_url: None,
    })
}

/// Match a `*`/`?` glob pattern against a string.
///
/// The pattern is compiled to an anchored regex; `*` matches any run of
/// characters, `?` exactly one.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let mut expr = String::with_capacity(pattern.len() + 2);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            _ => expr.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');

    match Regex::new(&expr) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}
