//! Structural comparison of a known tree against an edited tree.
//!
//! The line diff in [`report`](crate::report) shows what changed as text; this
//! module names the paths that changed, so a caller can list the discarded
//! keys directly. Mapping entries are matched by key and sequence elements by
//! position.
//!
//! # Examples
//!
//! ```
//! use editguard::canonical::{decode_generic, Format};
//! use editguard::diff::{compute_changes, ChangeKind};
//!
//! let known = decode_generic("name: a\nsize: 3", Format::Yaml).unwrap();
//! let edited = decode_generic("name: a\nsise: 3", Format::Yaml).unwrap();
//! let changes = compute_changes(&known, &edited);
//!
//! assert!(changes
//!     .iter()
//!     .any(|c| c.kind == ChangeKind::Discarded && c.path_string() == "sise"));
//! ```

use crate::tree::Node;
use std::collections::{BTreeMap, BTreeSet};

/// How a path differs between the known and the edited tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present in the edit, absent from the known object
    Discarded,
    /// Present in the known object, absent from the edit
    Missing,
    /// Present in both with different values
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Discarded => "discarded",
            ChangeKind::Missing => "missing",
            ChangeKind::Modified => "modified",
        }
    }
}

/// A single difference at a specific path.
///
/// Path components are either mapping keys (`"subnets"`) or sequence indices
/// (`"[0]"`).
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: Vec<String>,
    pub kind: ChangeKind,
    /// Value in the known object (None for Discarded changes)
    pub known: Option<Node>,
    /// Value in the edit (None for Missing changes)
    pub edited: Option<Node>,
}

impl Change {
    /// Joins the path with dots, keeping index components attached.
    ///
    /// - `["subnets", "[0]", "zone"]` → `"subnets[0].zone"`
    /// - `[]` → `"(root)"`
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_string();
        }

        let mut result = String::new();
        for (i, component) in self.path.iter().enumerate() {
            if i > 0 && !component.starts_with('[') {
                result.push('.');
            }
            result.push_str(component);
        }
        result
    }
}

/// Counts of changes by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStats {
    pub discarded: usize,
    pub missing: usize,
    pub modified: usize,
}

impl ChangeStats {
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut stats = Self::default();
        for change in changes {
            match change.kind {
                ChangeKind::Discarded => stats.discarded += 1,
                ChangeKind::Missing => stats.missing += 1,
                ChangeKind::Modified => stats.modified += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.discarded + self.missing + self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Computes every path at which `edited` differs from `known`, in key order.
pub fn compute_changes(known: &Node, edited: &Node) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_nodes(known, edited, Vec::new(), &mut changes);
    changes
}

fn diff_nodes(known: &Node, edited: &Node, path: Vec<String>, changes: &mut Vec<Change>) {
    match (known, edited) {
        (Node::Object(known_map), Node::Object(edited_map)) => {
            diff_objects(known_map, edited_map, path, changes);
        }
        (Node::Array(known_arr), Node::Array(edited_arr)) => {
            diff_arrays(known_arr, edited_arr, path, changes);
        }
        _ if known == edited => {}
        _ => changes.push(Change {
            path,
            kind: ChangeKind::Modified,
            known: Some(known.clone()),
            edited: Some(edited.clone()),
        }),
    }
}

fn diff_objects(
    known_map: &BTreeMap<String, Node>,
    edited_map: &BTreeMap<String, Node>,
    path: Vec<String>,
    changes: &mut Vec<Change>,
) {
    let keys: BTreeSet<&String> = known_map.keys().chain(edited_map.keys()).collect();

    for key in keys {
        let mut child_path = path.clone();
        child_path.push(key.clone());

        match (known_map.get(key), edited_map.get(key)) {
            (Some(known), Some(edited)) => diff_nodes(known, edited, child_path, changes),
            (None, Some(edited)) => changes.push(Change {
                path: child_path,
                kind: ChangeKind::Discarded,
                known: None,
                edited: Some(edited.clone()),
            }),
            (Some(known), None) => changes.push(Change {
                path: child_path,
                kind: ChangeKind::Missing,
                known: Some(known.clone()),
                edited: None,
            }),
            (None, None) => {}
        }
    }
}

fn diff_arrays(
    known_arr: &[Node],
    edited_arr: &[Node],
    path: Vec<String>,
    changes: &mut Vec<Change>,
) {
    let common = known_arr.len().min(edited_arr.len());

    for i in 0..common {
        let mut child_path = path.clone();
        child_path.push(format!("[{}]", i));
        diff_nodes(&known_arr[i], &edited_arr[i], child_path, changes);
    }

    for (i, item) in known_arr.iter().enumerate().skip(common) {
        let mut child_path = path.clone();
        child_path.push(format!("[{}]", i));
        changes.push(Change {
            path: child_path,
            kind: ChangeKind::Missing,
            known: Some(item.clone()),
            edited: None,
        });
    }

    for (i, item) in edited_arr.iter().enumerate().skip(common) {
        let mut child_path = path.clone();
        child_path.push(format!("[{}]", i));
        changes.push(Change {
            path: child_path,
            kind: ChangeKind::Discarded,
            known: None,
            edited: Some(item.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Number;

    fn yaml(content: &str) -> Node {
        serde_yaml::from_str(content).unwrap()
    }

    #[test]
    fn test_identical_trees() {
        let node = yaml("name: a\nsize: 3\nsubnets: [x, y]");
        assert!(compute_changes(&node, &node).is_empty());
    }

    #[test]
    fn test_typo_key() {
        let changes = compute_changes(&yaml("name: a\nsize: 3"), &yaml("name: a\nsise: 3"));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].path, vec!["sise"]);
        assert_eq!(changes[0].kind, ChangeKind::Discarded);
        assert_eq!(changes[0].edited, Some(Node::Number(Number::PosInt(3))));
        assert_eq!(changes[1].path, vec!["size"]);
        assert_eq!(changes[1].kind, ChangeKind::Missing);
    }

    #[test]
    fn test_nested_discarded_key() {
        let known = yaml("subnets:\n  - name: a\n    zone: z");
        let edited = yaml("subnets:\n  - name: a\n    zone: z\n    cidrr: 10.0.0.0/24");
        let changes = compute_changes(&known, &edited);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path_string(), "subnets[0].cidrr");
    }

    #[test]
    fn test_modified_value() {
        let changes = compute_changes(&yaml("size: 3"), &yaml("size: \"3\""));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Modified);
    }

    #[test]
    fn test_sequences_compare_positionally() {
        let changes = compute_changes(&yaml("[a, b]"), &yaml("[b, a, c]"));
        let stats = ChangeStats::from_changes(&changes);
        assert_eq!(stats.modified, 2);
        assert_eq!(stats.discarded, 1);
        assert_eq!(changes[2].path_string(), "[2]");
    }

    #[test]
    fn test_root_type_change() {
        let changes = compute_changes(&yaml("a: 1"), &yaml("[1]"));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path_string(), "(root)");
    }

    #[test]
    fn test_change_stats() {
        let stats = ChangeStats {
            discarded: 2,
            missing: 1,
            modified: 0,
        };
        assert_eq!(stats.total(), 3);
        assert!(!stats.is_empty());
        assert!(ChangeStats::default().is_empty());
    }
}
