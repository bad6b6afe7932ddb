//! Classpath domain types.
//!
//! A classpath's `path` doubles as its position in the hierarchy: a record is
//! a descendant of every record whose path is a strict prefix of its own.
//! There is no separator character and no stored parent reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when a paginated caller asks for a non-positive limit.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound applied to any requested page size.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// A persisted classpath record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classpath {
    pub id: i64,
    pub path: String,
    pub note: String,
    pub preset: bool,
    pub create_at: DateTime<Utc>,
    pub create_by: String,
    pub update_at: DateTime<Utc>,
    pub update_by: String,
}

/// Data for creating a new classpath.
///
/// Timestamps are stamped by the service at insert time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClasspath {
    pub path: String,
    pub note: String,
    #[serde(default)]
    pub preset: bool,
    #[serde(default)]
    pub create_by: String,
}

impl NewClasspath {
    /// Create a user classpath with the given path and note.
    pub fn new(path: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            note: note.into(),
            preset: false,
            create_by: String::new(),
        }
    }

    /// Mark the classpath as system-provided.
    #[must_use]
    pub const fn preset(mut self) -> Self {
        self.preset = true;
        self
    }

    /// Record the actor creating the classpath.
    #[must_use]
    pub fn created_by(mut self, actor: impl Into<String>) -> Self {
        self.create_by = actor.into();
        self
    }
}

/// Partial update of a classpath.
///
/// `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClasspathUpdate {
    pub path: Option<String>,
    pub note: Option<String>,
    pub preset: Option<bool>,
    pub update_by: Option<String>,
}

impl ClasspathUpdate {
    /// Returns `true` when no column would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.note.is_none()
            && self.preset.is_none()
            && self.update_by.is_none()
    }
}

/// Selection of classpaths for listing and counting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClasspathFilter {
    /// Substring that must occur in the path. Empty matches everything.
    pub query: String,
    /// Maximum number of records, `None` for all of them.
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ClasspathFilter {
    /// Every classpath, unpaginated.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Every classpath whose path contains `query`, unpaginated.
    pub fn matching(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Restrict to one page. A non-positive limit falls back to
    /// `DEFAULT_PAGE_SIZE`; larger ones are capped at `MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            limit.min(MAX_PAGE_SIZE)
        };
        self.limit = Some(limit);
        self.offset = offset.max(0);
        self
    }
}

/// A node of the reconstructed hierarchy.
///
/// `path` holds only the part of the record's path below the parent node;
/// concatenating the `path` of every node from a root down yields the
/// record's full path. Nodes are built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathNode {
    pub id: i64,
    pub path: String,
    pub note: String,
    pub preset: bool,
    pub children: Vec<ClasspathNode>,
}

impl ClasspathNode {
    /// Create a childless node for `classpath` carrying `suffix` as its path.
    pub fn leaf(classpath: &Classpath, suffix: &str) -> Self {
        Self {
            id: classpath.id,
            path: suffix.to_string(),
            note: classpath.note.clone(),
            preset: classpath.preset,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Full paths of this subtree in pre-order, given the concatenated path of
    /// every ancestor above it.
    pub fn full_paths(&self, ancestors: &str) -> Vec<String> {
        let own = format!("{ancestors}{}", self.path);
        let mut paths = vec![own.clone()];
        for child in &self.children {
            paths.extend(child.full_paths(&own));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, path: &str) -> Classpath {
        let now = Utc::now();
        Classpath {
            id,
            path: path.to_string(),
            note: String::new(),
            preset: false,
            create_at: now,
            create_by: "root".to_string(),
            update_at: now,
            update_by: "root".to_string(),
        }
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ClasspathUpdate::default().is_empty());

        let actor_only = ClasspathUpdate {
            update_by: Some("ops".to_string()),
            ..Default::default()
        };
        assert!(!actor_only.is_empty());

        let preset_only = ClasspathUpdate {
            preset: Some(false),
            ..Default::default()
        };
        assert!(!preset_only.is_empty());
    }

    #[test]
    fn test_page_is_clamped() {
        let filter = ClasspathFilter::matching("web").page(50_000, -3);
        assert_eq!(filter.limit, Some(MAX_PAGE_SIZE));
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.query, "web");

        let filter = ClasspathFilter::all().page(0, 40);
        assert_eq!(filter.limit, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(filter.offset, 40);
    }

    #[test]
    fn test_node_full_paths() {
        let mut root = ClasspathNode::leaf(&record(1, "infra"), "infra");
        root.children
            .push(ClasspathNode::leaf(&record(2, "infradb"), "db"));
        assert_eq!(root.node_count(), 2);
        assert!(!root.is_leaf());
        assert_eq!(root.full_paths(""), vec!["infra", "infradb"]);
    }

    #[test]
    fn test_node_serializes_children() {
        let node = ClasspathNode::leaf(&record(7, "infra"), "infra");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["path"], "infra");
        assert_eq!(json["children"], serde_json::json!([]));
    }
}
