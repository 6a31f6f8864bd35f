//! Line-level reports of what an edit carried beyond the known object.
//!
//! [`report`] compares two canonical forms. Equal bytes give an empty report;
//! otherwise the canonical texts are diffed line by line and grouped into
//! hunks with a few lines of surrounding context. Lines only in the known form
//! are prefixed `- `, lines only in the edit `+ `, and context lines with two
//! spaces. Separate hunks are joined by a `...` line.

use crate::canonical::{decode_generic, CanonicalForm};
use crate::diff::{compute_changes, Change, ChangeKind, ChangeStats};
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp};
use std::fmt;

/// Options for building a report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Unchanged lines shown before and after each change
    pub context_lines: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { context_lines: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Removed,
    Added,
}

impl LineTag {
    pub fn prefix(&self) -> &'static str {
        match self {
            LineTag::Context => "  ",
            LineTag::Removed => "- ",
            LineTag::Added => "+ ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

/// A run of changed lines with their context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based line in the known form where the hunk starts
    pub known_start: usize,
    /// 1-based line in the edited form where the hunk starts
    pub edited_start: usize,
    pub lines: Vec<DiffLine>,
}

/// The outcome of one comparison.
///
/// An empty report means nothing in the edit was discarded. Its display text
/// is the empty string.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub hunks: Vec<Hunk>,
    pub changes: Vec<Change>,
}

impl DiffReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn stats(&self) -> ChangeStats {
        ChangeStats::from_changes(&self.changes)
    }

    /// Paths present in the edit that the known object does not have.
    pub fn discarded_keys(&self) -> Vec<String> {
        self.changes
            .iter()
            .filter(|c| c.kind == ChangeKind::Discarded)
            .map(Change::path_string)
            .collect()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hunk) in self.hunks.iter().enumerate() {
            if i > 0 {
                writeln!(f, "...")?;
            }
            for line in &hunk.lines {
                writeln!(f, "{}{}", line.tag.prefix(), line.text)?;
            }
        }
        Ok(())
    }
}

/// Compares the known canonical form against the edited one.
pub fn report(
    known: &CanonicalForm,
    edited: &CanonicalForm,
    options: &ReportOptions,
) -> DiffReport {
    if known.as_bytes() == edited.as_bytes() {
        return DiffReport::empty();
    }

    let known_lines: Vec<&str> = known.as_str().lines().collect();
    let edited_lines: Vec<&str> = edited.as_str().lines().collect();
    let ops = capture_diff_slices(Algorithm::Myers, &known_lines, &edited_lines);

    let hunks: Vec<Hunk> = group_diff_ops(ops, options.context_lines)
        .into_iter()
        .filter_map(|group| build_hunk(group, &known_lines, &edited_lines))
        .collect();

    DiffReport {
        hunks,
        changes: structural_changes(known, edited),
    }
}

fn build_hunk(group: Vec<DiffOp>, known_lines: &[&str], edited_lines: &[&str]) -> Option<Hunk> {
    let first = group.first()?;
    let known_start = first.old_range().start + 1;
    let edited_start = first.new_range().start + 1;

    let mut lines = Vec::new();
    for op in group {
        match op {
            DiffOp::Equal { old_index, len, .. } => {
                let context = &known_lines[old_index..old_index + len];
                push_lines(&mut lines, LineTag::Context, context);
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                let removed = &known_lines[old_index..old_index + old_len];
                push_lines(&mut lines, LineTag::Removed, removed);
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                let added = &edited_lines[new_index..new_index + new_len];
                push_lines(&mut lines, LineTag::Added, added);
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let removed = &known_lines[old_index..old_index + old_len];
                let added = &edited_lines[new_index..new_index + new_len];
                push_lines(&mut lines, LineTag::Removed, removed);
                push_lines(&mut lines, LineTag::Added, added);
            }
        }
    }

    Some(Hunk {
        known_start,
        edited_start,
        lines,
    })
}

fn push_lines(lines: &mut Vec<DiffLine>, tag: LineTag, texts: &[&str]) {
    lines.extend(texts.iter().map(|text| DiffLine {
        tag,
        text: text.to_string(),
    }));
}

/// Canonical text always decodes again; if it somehow does not, the report
/// keeps its line diff and drops the path summary.
fn structural_changes(known: &CanonicalForm, edited: &CanonicalForm) -> Vec<Change> {
    let known_tree = decode_generic(known.as_str(), known.format());
    let edited_tree = decode_generic(edited.as_str(), edited.format());

    match (known_tree, edited_tree) {
        (Ok(known_tree), Ok(edited_tree)) => compute_changes(&known_tree, &edited_tree),
        (Err(e), _) | (_, Err(e)) => {
            log::debug!("canonical form did not decode again: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{normalize, CanonicalPolicy};

    fn form(raw: &str) -> CanonicalForm {
        normalize(raw, &CanonicalPolicy::default()).unwrap()
    }

    #[test]
    fn test_identical_forms_give_empty_report() {
        let known = form("name: a\nsize: 3");
        let report = report(&known, &known.clone(), &ReportOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_typo_is_reported() {
        let known = form("name: a\nsize: 3");
        let edited = form("name: a\nsise: 3");
        let report = report(&known, &edited, &ReportOptions::default());

        assert!(!report.is_empty());
        let text = report.to_string();
        assert!(text.starts_with("  name: a\n"));
        assert!(text.contains("- size: 3\n"));
        assert!(text.contains("+ sise: 3\n"));
        assert_eq!(report.discarded_keys(), vec!["sise"]);
    }

    #[test]
    fn test_context_lines_are_limited() {
        let known = form("a: 1\nb: 2\nc: 3\nd: 4\ne: 5\nf: 6");
        let edited = form("a: 1\nb: 2\nc: 3\nd: 4\ne: 5\nf: 6\ng: 7");
        let report = report(&known, &edited, &ReportOptions { context_lines: 1 });

        assert_eq!(report.hunks.len(), 1);
        assert_eq!(report.to_string(), "  f: 6\n+ g: 7\n");
        assert_eq!(report.hunks[0].known_start, 6);
        assert_eq!(report.hunks[0].edited_start, 6);
    }

    #[test]
    fn test_distant_changes_are_separated() {
        let known = form("a: 1\nb: 2\nc: 3\nd: 4\ne: 5\nf: 6\ng: 7\nh: 8");
        let edited = form("a: 1\naa: 0\nb: 2\nc: 3\nd: 4\ne: 5\nf: 6\ng: 7\nh: 8\nhh: 9");
        let report = report(&known, &edited, &ReportOptions { context_lines: 1 });

        assert_eq!(report.hunks.len(), 2);
        let text = report.to_string();
        assert!(text.contains("+ aa: 0\n"));
        assert!(text.contains("...\n"));
        assert!(text.ends_with("+ hh: 9\n"));
        assert_eq!(report.discarded_keys(), vec!["aa", "hh"]);
    }

    #[test]
    fn test_line_prefixes() {
        assert_eq!(LineTag::Context.prefix(), "  ");
        assert_eq!(LineTag::Removed.prefix(), "- ");
        assert_eq!(LineTag::Added.prefix(), "+ ");
    }
}
