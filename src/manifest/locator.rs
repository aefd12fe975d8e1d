//! Maps a structural path to the exact source line holding the field.
//!
//! Two phases: a structural existence check against the parsed document
//! (a path that does not resolve is rejected before any text search), then
//! a line-oriented walk of the raw text. Line search alone cannot tell a
//! key that merely looks right from one that is structurally correct, e.g.
//! two sibling maps sharing a key name at different nesting.

use std::collections::HashMap;

use crate::manifest::error::ManifestError;
use crate::manifest::parse_documents;
use crate::manifest::path::StructuralPath;

/// Fallback indentation increment when a document gives no signal
const DEFAULT_INDENT_STEP: usize = 2;

/// Find the zero-based line number of the field addressed by `path` in
/// document `document_index` of `text`.
pub fn locate(
    text: &str,
    path: &StructuralPath,
    document_index: usize,
) -> Result<usize, ManifestError> {
    let documents = parse_documents(text)?;
    let document = documents
        .get(document_index)
        .ok_or(ManifestError::DocumentOutOfRange {
            index: document_index,
        })?;
    if path.resolve_scalar(document).is_none() {
        return Err(ManifestError::PathNotResolved {
            path: path.to_string(),
            index: document_index,
        });
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let (doc_start, doc_end) =
        document_range(&lines, document_index).ok_or(ManifestError::DocumentOutOfRange {
            index: document_index,
        })?;
    let step = detect_indent_step(&lines[doc_start..doc_end]);

    let mut search_start = doc_start;
    let mut expected = 0usize;
    // Indent of the line that opened the current block; a non-blank line at
    // or below it ends the search window.
    let mut floor: Option<usize> = None;
    // Line allowed to sit on the floor itself: a sequence dash whose first
    // key is inline.
    let mut anchor: Option<usize> = None;

    let segments = path.segments();
    let mut located = None;
    for (pos, segment) in segments.iter().enumerate() {
        let found = match segment.parse::<usize>() {
            Ok(index) => {
                find_sequence_item(&lines, search_start, doc_end, expected, floor, anchor, index)
            }
            Err(_) => find_key(&lines, search_start, doc_end, expected, floor, anchor, segment),
        };
        let Some(line_no) = found else {
            return Err(ManifestError::LineNotFound {
                path: path.to_string(),
                segment: segment.clone(),
            });
        };

        if pos + 1 == segments.len() {
            located = Some(line_no);
            break;
        }

        let line_indent = indent_of(lines[line_no]);
        if segment.parse::<usize>().is_ok() {
            // Stay on the dash line: its first key may be inline. Keys of a
            // sequence entry sit two columns past the dash ("- " is two
            // bytes) whatever the file's mapping step is.
            search_start = line_no;
            expected = line_indent + 2;
            anchor = Some(line_no);
        } else {
            search_start = line_no + 1;
            expected += step;
            anchor = None;
        }
        floor = Some(line_indent);
    }

    located.ok_or_else(|| ManifestError::PathNotResolved {
        path: path.to_string(),
        index: document_index,
    })
}

/// Line range `[start, end)` owned by one document of a multi-document file
fn document_range(lines: &[&str], index: usize) -> Option<(usize, usize)> {
    let mut chunks: Vec<(usize, usize)> = Vec::new();
    let mut start = 0usize;
    for (i, line) in lines.iter().enumerate() {
        if is_separator(line) {
            chunks.push((start, i));
            start = i + 1;
        }
    }
    chunks.push((start, lines.len()));

    // A separator before any content opens document 0; drop the empty
    // chunk it produces.
    if chunks.len() > 1 {
        let (s, e) = chunks[0];
        if lines[s..e].iter().all(|l| is_blank_or_comment(l)) {
            chunks.remove(0);
        }
    }

    chunks.get(index).copied()
}

/// Sample the file's indentation increment: the most frequent positive
/// indent delta between consecutive non-blank, non-comment lines. Sampled
/// increments above 4 are collapsed toward a divisor (a run of "8" is two
/// levels of "4"); this is a best-effort guess on ambiguous files.
fn detect_indent_step(lines: &[&str]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut prev: Option<usize> = None;
    for line in lines {
        if is_blank_or_comment(line) {
            continue;
        }
        let indent = indent_of(line);
        if let Some(prev) = prev {
            if indent > prev {
                *counts.entry(indent - prev).or_insert(0) += 1;
            }
        }
        prev = Some(indent);
    }

    let mut step = counts
        .into_iter()
        .max_by_key(|&(delta, count)| (count, std::cmp::Reverse(delta)))
        .map(|(delta, _)| delta)
        .unwrap_or(DEFAULT_INDENT_STEP);
    while step > 4 {
        match (2..step).find(|f| step % f == 0) {
            Some(factor) => step /= factor,
            None => break,
        }
    }
    step
}

fn find_key(
    lines: &[&str],
    start: usize,
    end: usize,
    expected: usize,
    floor: Option<usize>,
    anchor: Option<usize>,
    key: &str,
) -> Option<usize> {
    for i in start..end {
        let line = lines[i];
        if is_blank_or_comment(line) {
            continue;
        }
        let raw = indent_of(line);
        if let Some(floor) = floor {
            if raw <= floor && anchor != Some(i) {
                return None;
            }
        }
        let (effective, content) = effective_content(line);
        if effective == expected && matches_key(content, key) {
            return Some(i);
        }
    }
    None
}

fn find_sequence_item(
    lines: &[&str],
    start: usize,
    end: usize,
    expected: usize,
    floor: Option<usize>,
    anchor: Option<usize>,
    index: usize,
) -> Option<usize> {
    let mut seen = 0usize;
    for i in start..end {
        let line = lines[i];
        if is_blank_or_comment(line) {
            continue;
        }
        let raw = indent_of(line);
        if let Some(floor) = floor {
            if raw <= floor && anchor != Some(i) {
                return None;
            }
        }
        if raw < expected {
            continue;
        }
        let content = line[raw..].trim_end();
        if content == "-" || content.starts_with("- ") {
            if seen == index {
                return Some(i);
            }
            seen += 1;
        }
    }
    None
}

/// Indent and content of a line, treating each leading `- ` of a sequence
/// entry as one extra level so inline keys (`- name: foo`) line up with
/// their siblings on the following lines.
fn effective_content(line: &str) -> (usize, &str) {
    let indent = indent_of(line);
    let mut content = &line[indent..];
    let mut effective = indent;
    while let Some(rest) = content.strip_prefix("- ") {
        effective += 2;
        content = rest;
    }
    (effective, content)
}

/// Case-sensitive exact key match: `key:`, optionally quoted, with either
/// nothing or an inline value after the colon.
fn matches_key(content: &str, key: &str) -> bool {
    let content = content.trim_end();
    let plain = format!("{key}:");
    let double = format!("\"{key}\":");
    let single = format!("'{key}':");
    for prefix in [plain, double, single] {
        if let Some(rest) = content.strip_prefix(prefix.as_str()) {
            if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t') {
                return true;
            }
        }
    }
    false
}

fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed == "---" || trimmed.starts_with("--- ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const APPLICATION: &str = r#"apiVersion: argoproj.io/v1alpha1
kind: Application
metadata:
  name: prometheus
spec:
  source:
    repoURL: https://prometheus-community.github.io/helm-charts
    chart: prometheus
    targetRevision: "15.9.0"  # pinned
  destination:
    namespace: monitoring
"#;

    const MULTI_SOURCE: &str = r#"spec:
  sources:
    - repoURL: https://charts.example.com
      chart: prometheus
      targetRevision: 15.9.0
    - repoURL: https://other.example.com
      chart: grafana
      targetRevision: 6.0.0
"#;

    #[test]
    fn locate_finds_nested_key() {
        let path = StructuralPath::from_dotted("spec.source.targetRevision");
        assert_eq!(locate(APPLICATION, &path, 0).unwrap(), 8);
    }

    #[rstest]
    #[case("spec.sources.0.targetRevision", 4)]
    #[case("spec.sources.1.targetRevision", 7)]
    #[case("spec.sources.1.chart", 6)]
    fn locate_walks_sequence_items(#[case] dotted: &str, #[case] expected_line: usize) {
        let path = StructuralPath::from_dotted(dotted);
        assert_eq!(locate(MULTI_SOURCE, &path, 0).unwrap(), expected_line);
    }

    #[test]
    fn locate_respects_document_index() {
        let text = "chart: a\nversion: 1.0.0\n---\nchart: b\nversion: 2.0.0\n";
        let path = StructuralPath::from_dotted("version");

        assert_eq!(locate(text, &path, 0).unwrap(), 1);
        assert_eq!(locate(text, &path, 1).unwrap(), 4);
    }

    #[test]
    fn locate_handles_leading_separator() {
        let text = "---\nchart: a\nversion: 1.0.0\n";
        let path = StructuralPath::from_dotted("version");

        assert_eq!(locate(text, &path, 0).unwrap(), 2);
    }

    #[test]
    fn locate_rejects_path_that_does_not_resolve() {
        let path = StructuralPath::from_dotted("spec.source.missing");
        let err = locate(APPLICATION, &path, 0).unwrap_err();

        assert!(matches!(err, ManifestError::PathNotResolved { .. }));
    }

    #[test]
    fn locate_rejects_document_out_of_range() {
        let path = StructuralPath::from_dotted("spec");
        let err = locate(APPLICATION, &path, 3).unwrap_err();

        assert!(matches!(err, ManifestError::DocumentOutOfRange { index: 3 }));
    }

    #[test]
    fn locate_does_not_match_same_key_under_wrong_parent() {
        // Both maps carry "version"; the path names the second sibling.
        let text = "first:\n  version: 1.0.0\nsecond:\n  version: 2.0.0\n";
        let path = StructuralPath::from_dotted("second.version");

        assert_eq!(locate(text, &path, 0).unwrap(), 3);
    }

    #[test]
    fn locate_stops_at_end_of_enclosing_block() {
        // "version" exists at top level but not inside "spec"; the parsed
        // pre-check rejects the path before any line scan.
        let text = "spec:\n  chart: a\nversion: 1.0.0\n";
        let path = StructuralPath::from_dotted("spec.version");

        assert!(matches!(
            locate(text, &path, 0).unwrap_err(),
            ManifestError::PathNotResolved { .. }
        ));
    }

    #[test]
    fn locate_handles_four_space_indentation() {
        let text = "spec:\n    source:\n        chart: nginx\n        targetRevision: 1.0.0\n";
        let path = StructuralPath::from_dotted("spec.source.targetRevision");

        assert_eq!(locate(text, &path, 0).unwrap(), 3);
    }

    #[test]
    fn locate_finds_sequence_item_keys_in_four_space_files() {
        // Keys inside an entry sit at dash + 2 even though the mapping
        // step is 4.
        let text = "spec:\n    sources:\n        - repoURL: https://charts.example.com\n          chart: prometheus\n          targetRevision: 15.9.0\n";
        let path = StructuralPath::from_dotted("spec.sources.0.targetRevision");

        assert_eq!(locate(text, &path, 0).unwrap(), 4);
    }

    #[test]
    fn locate_returns_dash_line_for_scalar_sequence_entry() {
        let text = "versions:\n  - 1.0.0\n  - 2.0.0\n";
        let path = StructuralPath::from_dotted("versions.1");

        assert_eq!(locate(text, &path, 0).unwrap(), 2);
    }

    #[rstest]
    #[case(&["a: 1", "  b: 2", "  c: 3"], 2)]
    #[case(&["a: 1", "    b: 2", "    c: 3", "d: 4", "    e: 5"], 4)]
    #[case(&["a: 1"], 2)] // no signal, default
    #[case(&["a: 1", "        b: 2"], 4)] // 8 collapses to two levels of 4
    fn detect_indent_step_samples_deltas(#[case] lines: &[&str], #[case] expected: usize) {
        assert_eq!(detect_indent_step(lines), expected);
    }

    #[test]
    fn skips_comments_and_blank_lines_when_sampling() {
        let lines = ["a: 1", "", "# comment", "  b: 2"];
        assert_eq!(detect_indent_step(&lines), 2);
    }
}
