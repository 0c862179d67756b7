//! Per-file version trees.
//!
//! Every file owns one [`VersionTree`]: an append-only tree of
//! [`VersionNode`]s rooted at an empty, already-frozen version 0.
//!
//! ```text
//!   v0 (frozen, "")
//!    ├── v1 (frozen, "hello")
//!    │    └── v3 (open, "hello world")   <- active
//!    └── v2 (frozen, "draft")
//! ```
//!
//! Open nodes are edited in place. Once a node is snapshotted it is frozen,
//! and the next insert or update branches a new child off it. Rollback only
//! moves the active pointer; nodes are never removed.

mod error;
mod node;
mod version_tree;

pub use error::{TreeError, TreeResult};
pub use node::{VersionId, VersionNode};
pub use version_tree::{History, HistoryEntry, VersionTree, ROOT};
