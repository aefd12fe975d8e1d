//! Clusters selected updates into named change-request batches.
//!
//! An update lands in the first group (definition order) whose patterns
//! match the chart name and whose bump allow-list, if present, includes the
//! update's bump kind. Everything else falls into the implicit "ungrouped"
//! bucket. Each update belongs to exactly one group.

use indexmap::IndexMap;

use crate::config::GroupRule;
use crate::version::selector::glob_match;
use crate::version::types::VersionUpdate;

/// Name of the bucket for updates no definition claims
pub const UNGROUPED: &str = "ungrouped";

pub fn group_updates(
    updates: Vec<VersionUpdate>,
    groups: &[GroupRule],
) -> IndexMap<String, Vec<VersionUpdate>> {
    let mut buckets: IndexMap<String, Vec<VersionUpdate>> = IndexMap::new();

    for update in updates {
        let name = groups
            .iter()
            .find(|group| matches_group(group, &update))
            .map(|group| group.name.as_str())
            .unwrap_or(UNGROUPED);
        buckets.entry(name.to_string()).or_default().push(update);
    }

    buckets
}

fn matches_group(group: &GroupRule, update: &VersionUpdate) -> bool {
    let name_matches = group
        .patterns
        .iter()
        .any(|pattern| glob_match(pattern, &update.dependency.chart_name));
    let bump_allowed = group
        .bumps
        .as_ref()
        .map_or(true, |allowed| allowed.contains(&update.bump));
    name_matches && bump_allowed
}
