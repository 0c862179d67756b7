//! A single version of a file.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identifier of a version within its tree. Dense, starting at 0 for the root.
pub type VersionId = usize;

/// One version of a file's content.
///
/// A node starts out open and may be edited in place. Snapshotting freezes
/// it: from then on its content and message are permanent and the owning
/// tree refuses to mutate it. Parent and child links are ids into the
/// owning tree's node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionNode {
    id: VersionId,
    content: String,
    message: String,
    created_at: DateTime<Utc>,
    snapshot_at: Option<DateTime<Utc>>,
    parent: Option<VersionId>,
    children: Vec<VersionId>,
}

impl VersionNode {
    /// create an open node
    pub(crate) fn open(
        id: VersionId,
        parent: Option<VersionId>,
        content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content,
            message: String::new(),
            created_at: now,
            snapshot_at: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot message; empty for open nodes.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot_at
    }

    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    /// Child ids in creation order.
    pub fn children(&self) -> &[VersionId] {
        &self.children
    }

    /// true once the node has been snapshotted
    pub fn is_frozen(&self) -> bool {
        self.snapshot_at.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    // The mutators below are only reachable through `VersionTree`, which
    // checks `is_frozen` first.

    pub(crate) fn append(&mut self, text: &str) {
        debug_assert!(!self.is_frozen());
        self.content.push_str(text);
    }

    pub(crate) fn replace(&mut self, text: &str) {
        debug_assert!(!self.is_frozen());
        self.content.clear();
        self.content.push_str(text);
    }

    pub(crate) fn freeze(&mut self, message: &str, now: DateTime<Utc>) {
        debug_assert!(!self.is_frozen());
        self.message = message.to_string();
        self.snapshot_at = Some(now);
    }

    pub(crate) fn push_child(&mut self, child: VersionId) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_node_is_mutable() {
        let mut node = VersionNode::open(3, Some(1), "abc".into(), DateTime::UNIX_EPOCH);
        assert!(!node.is_frozen());
        assert!(!node.is_root());
        node.append("def");
        assert_eq!(node.content(), "abcdef");
        node.replace("x");
        assert_eq!(node.content(), "x");
        assert_eq!(node.message(), "");
    }

    #[test]
    fn test_freeze_sets_message_and_time() {
        let t = DateTime::UNIX_EPOCH + chrono::Duration::seconds(10);
        let mut node = VersionNode::open(0, None, String::new(), DateTime::UNIX_EPOCH);
        node.freeze("first", t);
        assert!(node.is_frozen());
        assert!(node.is_root());
        assert_eq!(node.snapshot_at(), Some(t));
        assert_eq!(node.message(), "first");
        assert_eq!(node.created_at(), DateTime::UNIX_EPOCH);
    }
}
