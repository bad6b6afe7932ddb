//! Reconstruction of the classpath hierarchy from a flat, path-sorted list.
//!
//! Paths carry no separator: `infraweb` is a child of `infra` purely because
//! it starts with it. With records sorted by path, every descendant of a
//! record follows it directly, before any of its later siblings. Comparing a
//! record against the *last* node of each level is therefore enough to find
//! its parent, and the whole tree is built in one pass without searching.
//!
//! Both builders check the sort order first and fail instead of producing a
//! mis-nested result. They hold no state and can run concurrently.

use thiserror::Error;

use crate::domain::{Classpath, ClasspathNode};

/// Input that violates the builders' preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("classpaths are not sorted by path: {previous:?} precedes {next:?}")]
    Unsorted { previous: String, next: String },

    #[error("duplicate classpath path: {0:?}")]
    DuplicatePath(String),

    #[error("classpath {path:?} does not start with prefix {prefix:?}")]
    OutsidePrefix { path: String, prefix: String },
}

/// Check that `records` are strictly ascending by path.
pub fn ensure_sorted(records: &[Classpath]) -> Result<(), HierarchyError> {
    for pair in records.windows(2) {
        let (previous, next) = (&pair[0].path, &pair[1].path);
        match previous.cmp(next) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => return Err(HierarchyError::DuplicatePath(next.clone())),
            std::cmp::Ordering::Greater => {
                return Err(HierarchyError::Unsorted {
                    previous: previous.clone(),
                    next: next.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Build the forest of all `records`, which must be sorted by path.
///
/// A record whose implied ancestors are missing hangs under the nearest
/// existing one, or becomes a root.
pub fn build_tree(records: &[Classpath]) -> Result<Vec<ClasspathNode>, HierarchyError> {
    ensure_sorted(records)?;

    let mut roots = Vec::new();
    for record in records {
        insert(&mut roots, record);
    }
    Ok(roots)
}

/// Descend through the last node of each level for as long as it prefixes
/// what is left of the path, then append the remainder there.
fn insert(roots: &mut Vec<ClasspathNode>, record: &Classpath) {
    let mut level = roots;
    let mut remaining = record.path.as_str();
    loop {
        let Some(last) = level.len().checked_sub(1) else {
            break;
        };
        let Some(rest) = remaining.strip_prefix(level[last].path.as_str()) else {
            break;
        };
        remaining = rest;
        level = &mut level[last].children;
    }
    level.push(ClasspathNode::leaf(record, remaining));
}

/// Immediate children of `prefix`, each carrying only its path below it.
///
/// `records` is the sorted result of a prefix lookup: the first entry is the
/// classpath for `prefix` itself and every other entry starts with `prefix`.
/// When the first entry is not an exact match, `prefix` is not a classpath
/// and has no children. Deeper descendants are skipped.
pub fn direct_children(
    records: &[Classpath],
    prefix: &str,
) -> Result<Vec<Classpath>, HierarchyError> {
    ensure_sorted(records)?;

    let Some((anchor, rest)) = records.split_first() else {
        return Ok(Vec::new());
    };
    if anchor.path != prefix {
        return Ok(Vec::new());
    }

    let mut children = Vec::new();
    let mut previous: Option<&str> = None;
    for record in rest {
        if previous.is_some_and(|child| record.path.starts_with(child)) {
            continue;
        }
        let suffix = record
            .path
            .strip_prefix(prefix)
            .ok_or_else(|| HierarchyError::OutsidePrefix {
                path: record.path.clone(),
                prefix: prefix.to_string(),
            })?;
        children.push(Classpath {
            path: suffix.to_string(),
            ..record.clone()
        });
        previous = Some(record.path.as_str());
    }
    Ok(children)
}
