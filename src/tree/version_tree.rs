//! The version tree of a single file.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tree::error::{TreeError, TreeResult};
use crate::tree::node::{VersionId, VersionNode};

/// Id of the root version.
pub const ROOT: VersionId = 0;

/// Append-only history of one file.
///
/// Nodes live in a dense table indexed by id. The tree only grows: ids are
/// never reused and nodes are never removed.
#[derive(Debug, Clone)]
pub struct VersionTree {
    nodes: Vec<VersionNode>,
    active: VersionId,
    last_modified: DateTime<Utc>,
}

impl VersionTree {
    /// Create a tree holding a single frozen, empty root.
    pub fn new(now: DateTime<Utc>) -> Self {
        let mut root = VersionNode::open(ROOT, None, String::new(), now);
        root.freeze("", now);

        Self {
            nodes: vec![root],
            active: ROOT,
            last_modified: now,
        }
    }

    /// Content of the active version.
    pub fn read(&self) -> &str {
        self.active_node().content()
    }

    /// Append `text` to the active version.
    ///
    /// Edits an open active node in place. If the active node is frozen, a
    /// new child holding `active.content + text` becomes active instead.
    pub fn insert(&mut self, text: &str, now: DateTime<Utc>) {
        self.last_modified = now;
        if self.active_node().is_frozen() {
            let content = format!("{}{}", self.read(), text);
            self.branch(content, now);
        } else {
            self.active_node_mut().append(text);
        }
    }

    /// Replace the active version's content with `text`.
    ///
    /// Same branching rule as [`insert`](Self::insert).
    pub fn update(&mut self, text: &str, now: DateTime<Utc>) {
        self.last_modified = now;
        if self.active_node().is_frozen() {
            self.branch(text.to_string(), now);
        } else {
            self.active_node_mut().replace(text);
        }
    }

    /// Freeze the active version with `message`.
    pub fn snapshot(&mut self, message: &str, now: DateTime<Utc>) -> TreeResult<VersionId> {
        let active = self.active_node();
        if active.is_frozen() {
            return Err(TreeError::AlreadySnapshotted { id: active.id() });
        }

        self.last_modified = now;
        self.active_node_mut().freeze(message, now);
        Ok(self.active)
    }

    /// Move the active pointer.
    ///
    /// With no target the active node's parent becomes active. With a
    /// target, any existing version may become active whether it is frozen
    /// or open. Returns the new active id.
    pub fn rollback(&mut self, target: Option<VersionId>) -> TreeResult<VersionId> {
        let next = match target {
            Some(id) if id >= self.nodes.len() => {
                return Err(TreeError::InvalidId {
                    id,
                    total: self.nodes.len(),
                })
            }
            Some(id) => id,
            None => self.active_node().parent().ok_or(TreeError::NoParent)?,
        };

        self.active = next;
        Ok(next)
    }

    /// Snapshots on the branch from the root to the active version, oldest
    /// first.
    pub fn history(&self) -> History<'_> {
        let mut path = Vec::new();
        let mut cursor = Some(self.active);
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if node.is_frozen() {
                path.push(id);
            }
            cursor = node.parent();
        }
        path.reverse();

        History {
            tree: self,
            ids: path,
            next: 0,
        }
    }

    /// Record `now` as the last modification time without editing content.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }

    pub fn total_versions(&self) -> usize {
        self.nodes.len()
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn active_id(&self) -> VersionId {
        self.active
    }

    pub fn active_node(&self) -> &VersionNode {
        &self.nodes[self.active]
    }

    /// Look up any version by id.
    pub fn node(&self, id: VersionId) -> Option<&VersionNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> &VersionNode {
        &self.nodes[ROOT]
    }

    fn active_node_mut(&mut self) -> &mut VersionNode {
        &mut self.nodes[self.active]
    }

    /// Create a child of the active node and make it active.
    fn branch(&mut self, content: String, now: DateTime<Utc>) {
        let id = self.nodes.len();
        let parent = self.active;
        self.nodes.push(VersionNode::open(id, Some(parent), content, now));
        self.nodes[parent].push_child(id);
        self.active = id;
    }
}

/// A snapshot on the active branch, as reported by HISTORY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry<'a> {
    pub id: VersionId,
    pub created_at: DateTime<Utc>,
    pub snapshot_at: DateTime<Utc>,
    pub message: &'a str,
}

/// Lazy iterator over the snapshots on the active branch.
///
/// Walking it does not touch the tree, so a clone taken before consuming
/// yields the same entries again.
#[derive(Debug, Clone)]
pub struct History<'a> {
    tree: &'a VersionTree,
    ids: Vec<VersionId>,
    next: usize,
}

impl<'a> Iterator for History<'a> {
    type Item = HistoryEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.get(self.next)?;
        self.next += 1;

        let node = &self.tree.nodes[id];
        // only frozen ids are collected
        let snapshot_at = node.snapshot_at()?;
        Some(HistoryEntry {
            id,
            created_at: node.created_at(),
            snapshot_at,
            message: node.message(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for History<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + Duration::seconds(secs)
    }

    #[test]
    fn test_new_tree_has_frozen_empty_root() {
        let tree = VersionTree::new(t(0));
        assert_eq!(tree.read(), "");
        assert_eq!(tree.total_versions(), 1);
        assert_eq!(tree.active_id(), ROOT);
        assert!(tree.root().is_frozen());

        let history: Vec<_> = tree.history().collect();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 0);
        assert_eq!(history[0].message, "");
    }

    #[test]
    fn test_insert_on_frozen_branches() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("hi", t(1));
        assert_eq!(tree.total_versions(), 2);
        assert_eq!(tree.active_id(), 1);
        assert_eq!(tree.active_node().parent(), Some(0));
        assert_eq!(tree.root().children(), &[1]);
        assert_eq!(tree.read(), "hi");
        assert_eq!(tree.last_modified(), t(1));
    }

    #[test]
    fn test_repeated_insert_on_open_node_concatenates() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("foo", t(1));
        tree.insert("bar", t(2));
        assert_eq!(tree.total_versions(), 2);
        assert_eq!(tree.read(), "foobar");
        assert_eq!(tree.last_modified(), t(2));
    }

    #[test]
    fn test_update_replaces() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("abc", t(1));
        tree.update("xyz", t(2));
        assert_eq!(tree.total_versions(), 2);
        assert_eq!(tree.read(), "xyz");

        tree.snapshot("v1", t(3)).unwrap();
        tree.update("new", t(4));
        assert_eq!(tree.total_versions(), 3);
        assert_eq!(tree.read(), "new");
        assert_eq!(tree.active_node().parent(), Some(1));
    }

    #[test]
    fn test_insert_after_snapshot_copies_parent_content() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("hello", t(1));
        tree.snapshot("v1", t(2)).unwrap();
        tree.insert(" world", t(3));
        assert_eq!(tree.read(), "hello world");
        assert_eq!(tree.node(1).unwrap().content(), "hello");
    }

    #[test]
    fn test_snapshot_twice_fails_without_changes() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("a", t(1));
        assert_eq!(tree.snapshot("first", t(2)), Ok(1));

        let err = tree.snapshot("second", t(3)).unwrap_err();
        assert_eq!(err, TreeError::AlreadySnapshotted { id: 1 });
        assert_eq!(tree.active_node().message(), "first");
        assert_eq!(tree.active_node().snapshot_at(), Some(t(2)));
        assert_eq!(tree.total_versions(), 2);
        assert_eq!(tree.last_modified(), t(2));
    }

    #[test]
    fn test_snapshot_root_fails() {
        let mut tree = VersionTree::new(t(0));
        assert_eq!(
            tree.snapshot("again", t(1)),
            Err(TreeError::AlreadySnapshotted { id: 0 })
        );
    }

    #[test]
    fn test_rollback_to_parent() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("x", t(1));
        assert_eq!(tree.rollback(None), Ok(0));
        assert_eq!(tree.read(), "");
        assert_eq!(tree.rollback(None), Err(TreeError::NoParent));
        assert_eq!(tree.active_id(), 0);
    }

    #[test]
    fn test_rollback_to_id() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("one", t(1));
        tree.snapshot("v1", t(2)).unwrap();
        tree.update("two", t(3));

        assert_eq!(
            tree.rollback(Some(2)),
            Ok(2),
            "open nodes are valid rollback targets"
        );
        assert_eq!(
            tree.rollback(Some(3)),
            Err(TreeError::InvalidId { id: 3, total: 3 })
        );
        assert_eq!(tree.active_id(), 2);

        tree.rollback(Some(1)).unwrap();
        assert_eq!(tree.read(), "one");
        assert_eq!(tree.total_versions(), 3);
    }

    #[test]
    fn test_rollback_round_trip() {
        let mut tree = VersionTree::new(t(0));
        tree.update("original", t(1));
        tree.snapshot("base", t(2)).unwrap();
        let previous = tree.active_id();

        tree.update("changed", t(3));
        tree.snapshot("", t(4)).unwrap();
        tree.rollback(Some(previous)).unwrap();
        assert_eq!(tree.read(), "original");
    }

    #[test]
    fn test_edit_after_rollback_to_frozen_creates_sibling() {
        let mut tree = VersionTree::new(t(0));
        tree.update("a", t(1));
        tree.snapshot("a", t(2)).unwrap();
        tree.rollback(Some(0)).unwrap();
        tree.update("b", t(3));

        assert_eq!(tree.active_id(), 2);
        assert_eq!(tree.root().children(), &[1, 2]);
        assert_eq!(tree.node(1).unwrap().content(), "a");
    }

    #[test]
    fn test_history_follows_active_branch() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("hi", t(1));
        tree.snapshot("v1", t(2)).unwrap();
        tree.update("bye", t(3));

        let history: Vec<_> = tree.history().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 0);
        assert_eq!(history[1].id, 1);
        assert_eq!(history[1].message, "v1");
        assert_eq!(history[1].created_at, t(1));
        assert_eq!(history[1].snapshot_at, t(2));

        // a sibling branch is not part of the active branch
        tree.rollback(Some(0)).unwrap();
        tree.update("other", t(4));
        tree.snapshot("side", t(5)).unwrap();
        let ids: Vec<_> = tree.history().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 3]);
    }

    #[test]
    fn test_history_is_restartable() {
        let mut tree = VersionTree::new(t(0));
        tree.insert("a", t(1));
        tree.snapshot("a", t(2)).unwrap();

        let history = tree.history();
        assert_eq!(history.len(), 2);
        let first: Vec<_> = history.clone().collect();
        let second: Vec<_> = history.collect();
        assert_eq!(first, second);
    }
}
