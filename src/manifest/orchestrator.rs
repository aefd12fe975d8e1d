//! Applies a batch of update decisions to manifest files.
//!
//! Updates are grouped by file; each file is read once and every edit for
//! it is applied against the progressively mutated text, so multiple edits
//! to one file compose. Locate runs again for every edit because earlier
//! edits may shift line content. After all edits the full text is re-parsed;
//! a file that no longer parses is discarded untouched. A failure in one
//! file never prevents the others from being processed.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::manifest::error::ManifestError;
use crate::manifest::types::FileDiff;
use crate::manifest::{locator, mutator, parse_documents};
use crate::version::types::VersionUpdate;

/// Apply every update to its manifest and collect one diff record per
/// changed file. No-op updates produce no record.
pub fn update_manifests(updates: &[VersionUpdate]) -> Vec<FileDiff> {
    let mut by_file: IndexMap<PathBuf, Vec<&VersionUpdate>> = IndexMap::new();
    for update in updates {
        by_file
            .entry(update.dependency.manifest_path.clone())
            .or_default()
            .push(update);
    }

    let mut diffs = Vec::new();
    for (path, file_updates) in by_file {
        match apply_file(&path, &file_updates) {
            Ok(Some(diff)) => diffs.push(diff),
            Ok(None) => debug!(path = %path.display(), "manifest unchanged"),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping manifest"),
        }
    }
    diffs
}

fn apply_file(path: &Path, updates: &[&VersionUpdate]) -> Result<Option<FileDiff>, ManifestError> {
    let original = fs::read_to_string(path)?;
    let mut text = original.clone();
    let mut applied = Vec::new();

    for update in updates {
        match apply_one(&text, update) {
            Ok(mutated) => {
                if mutated != text {
                    text = mutated;
                    applied.push((*update).clone());
                }
            }
            // One unlocatable field drops only that update; the file's
            // other updates are still attempted.
            Err(e) => warn!(
                path = %path.display(),
                chart = %update.dependency.chart_name,
                field = %update.dependency.version_path,
                error = %e,
                "skipping update"
            ),
        }
    }

    if text == original {
        return Ok(None);
    }

    parse_documents(&text).map_err(|source| ManifestError::InvalidAfterEdit {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(FileDiff {
        path: path.to_path_buf(),
        original,
        mutated: text,
        applied,
    }))
}

fn apply_one(text: &str, update: &VersionUpdate) -> Result<String, ManifestError> {
    let dependency = &update.dependency;
    let line_no = locator::locate(text, &dependency.version_path, dependency.document_index)?;

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    lines[line_no] = mutator::replace_value(&lines[line_no], &update.new_version);
    Ok(lines.join("\n"))
}
