//! Name-to-tree directory with live rankings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::rank::{RankEntry, RankIndex};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::types::FileName;
use crate::tree::{History, VersionId, VersionTree};

/// Registry behaviour switches.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Treat a rollback as a modification: the file's last-modified time is
    /// set to the rollback time and it moves to the front of RECENT_FILES.
    pub rollback_touches_recency: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rollback_touches_recency: true,
        }
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of files.
    pub files: usize,
    /// Versions across all files.
    pub total_versions: usize,
    /// Snapshots across all files, including every root.
    pub total_snapshots: usize,
}

/// All files of the store and their rankings.
pub struct FileRegistry {
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    files: HashMap<FileName, VersionTree>,
    by_recency: RankIndex<DateTime<Utc>>,
    by_versions: RankIndex<usize>,
}

impl FileRegistry {
    /// Create an empty registry on the system clock.
    pub fn new() -> Self {
        Self::with_clock(RegistryConfig::default(), Arc::new(SystemClock::new()))
    }

    /// Create an empty registry with an explicit configuration and clock.
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            files: HashMap::new(),
            by_recency: RankIndex::new(),
            by_versions: RankIndex::new(),
        }
    }

    /// Register a new, empty file.
    pub fn create_file(&mut self, name: &str) -> RegistryResult<()> {
        let name = FileName::new(name)?;
        if self.files.contains_key(name.as_str()) {
            return Err(RegistryError::AlreadyExists(name.into_string()));
        }

        let tree = VersionTree::new(self.clock.now());
        self.by_recency.upsert(name.as_str(), tree.last_modified());
        self.by_versions.upsert(name.as_str(), tree.total_versions());
        debug!(file = %name, "created file");
        self.files.insert(name, tree);
        Ok(())
    }

    /// The version tree for `name`.
    pub fn lookup(&self, name: &str) -> RegistryResult<&VersionTree> {
        self.files
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    fn lookup_mut(&mut self, name: &str) -> RegistryResult<&mut VersionTree> {
        self.files
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Content of the active version of `name`.
    pub fn read_file(&self, name: &str) -> RegistryResult<&str> {
        Ok(self.lookup(name)?.read())
    }

    /// Append to `name`, branching if its active version is frozen.
    pub fn insert(&mut self, name: &str, text: &str) -> RegistryResult<()> {
        let now = self.clock.now();
        let tree = self.lookup_mut(name)?;
        tree.insert(text, now);
        let (modified, versions) = (tree.last_modified(), tree.total_versions());
        trace!(file = name, bytes = text.len(), versions, "insert");

        self.by_recency.upsert(name, modified);
        self.by_versions.upsert(name, versions);
        Ok(())
    }

    /// Replace the content of `name`, branching if its active version is
    /// frozen.
    pub fn update(&mut self, name: &str, text: &str) -> RegistryResult<()> {
        let now = self.clock.now();
        let tree = self.lookup_mut(name)?;
        tree.update(text, now);
        let (modified, versions) = (tree.last_modified(), tree.total_versions());
        trace!(file = name, bytes = text.len(), versions, "update");

        self.by_recency.upsert(name, modified);
        self.by_versions.upsert(name, versions);
        Ok(())
    }

    /// Freeze the active version of `name`. Returns the frozen version id.
    pub fn snapshot(&mut self, name: &str, message: &str) -> RegistryResult<VersionId> {
        let now = self.clock.now();
        let tree = self.lookup_mut(name)?;
        let id = tree.snapshot(message, now)?;
        let modified = tree.last_modified();
        debug!(file = name, version = id, "snapshot");

        self.by_recency.upsert(name, modified);
        Ok(id)
    }

    /// Move the active version of `name` to its parent or to `target`.
    /// Returns the new active version id.
    pub fn rollback(
        &mut self,
        name: &str,
        target: Option<VersionId>,
    ) -> RegistryResult<VersionId> {
        let now = self.clock.now();
        let touch = self.config.rollback_touches_recency;
        let tree = self.lookup_mut(name)?;
        let id = tree.rollback(target)?;
        debug!(file = name, version = id, "rollback");

        if touch {
            tree.touch(now);
            let modified = tree.last_modified();
            self.by_recency.upsert(name, modified);
        }
        Ok(id)
    }

    /// Snapshots on the active branch of `name`, root first.
    pub fn history(&self, name: &str) -> RegistryResult<History<'_>> {
        Ok(self.lookup(name)?.history())
    }

    /// The `k` most recently modified files, or all of them for `None`.
    pub fn top_by_recency(
        &self,
        k: Option<usize>,
    ) -> RegistryResult<Vec<RankEntry<DateTime<Utc>>>> {
        let k = k.unwrap_or(self.by_recency.len());
        Ok(self.by_recency.top_k(k)?)
    }

    /// The `k` files with the most versions, or all of them for `None`.
    pub fn top_by_version_count(&self, k: Option<usize>) -> RegistryResult<Vec<RankEntry<usize>>> {
        let k = k.unwrap_or(self.by_versions.len());
        Ok(self.by_versions.top_k(k)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All file names, sorted.
    pub fn names(&self) -> Vec<&FileName> {
        let mut names: Vec<_> = self.files.keys().collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> RegistryStats {
        self.files.values().fold(
            RegistryStats {
                files: self.files.len(),
                total_versions: 0,
                total_snapshots: 0,
            },
            |mut stats, tree| {
                stats.total_versions += tree.total_versions();
                stats.total_snapshots += (0..tree.total_versions())
                    .filter_map(|id| tree.node(id))
                    .filter(|node| node.is_frozen())
                    .count();
                stats
            },
        )
    }
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
