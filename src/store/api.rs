//! Store API - high-level interface for verstore.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::command::{Command, ParseError, Parser, USAGE};
use crate::rank::RankEntry;
use crate::registry::{FileRegistry, RegistryConfig, RegistryError, RegistryStats};
use crate::store::output::{CommandOutput, HistoryRecord};
use crate::tree::VersionId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if the command named a file that doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Registry(e) if e.is_not_found())
    }

    /// Check if the command itself was malformed.
    pub fn is_usage(&self) -> bool {
        matches!(self, StoreError::Parse(_))
    }

    /// Check if the command was well-formed but rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, StoreError::Registry(_))
    }
}

/// Store configuration options.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Rollbacks count as modifications for RECENT_FILES.
    pub rollback_touches_recency: bool,
    /// Log every command at info level instead of debug.
    pub verbose: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rollback_touches_recency: true,
            verbose: false,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rollback_touches_recency flag.
    pub fn rollback_touches_recency(mut self, value: bool) -> Self {
        self.rollback_touches_recency = value;
        self
    }

    /// Set verbose flag.
    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of files.
    pub files: usize,
    /// Versions across all files.
    pub total_versions: usize,
    /// Snapshots across all files.
    pub total_snapshots: usize,
}

impl From<RegistryStats> for StoreStats {
    fn from(stats: RegistryStats) -> Self {
        Self {
            files: stats.files,
            total_versions: stats.total_versions,
            total_snapshots: stats.total_snapshots,
        }
    }
}

/// The store handle.
///
/// All state sits behind one mutex, so a version tree change and the
/// ranking updates it causes are observed together. Share across threads
/// with `Arc<Store>`.
pub struct Store {
    config: StoreConfig,
    registry: Mutex<FileRegistry>,
}

impl Store {
    /// Create an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with custom configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create an empty store reading time from `clock`.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let registry_config = RegistryConfig {
            rollback_touches_recency: config.rollback_touches_recency,
        };
        Self {
            registry: Mutex::new(FileRegistry::with_clock(registry_config, clock)),
            config,
        }
    }

    /// Parse and run one command line.
    pub fn execute(&self, line: &str) -> StoreResult<CommandOutput> {
        if self.config.verbose {
            info!(line, "execute");
        } else {
            debug!(line, "execute");
        }

        let command = Parser::parse(line)?;
        self.run(command)
    }

    /// Run every non-blank line of `script`, stopping at the first error
    /// or at EXIT.
    pub fn execute_script(&self, script: &str) -> StoreResult<Vec<CommandOutput>> {
        let mut results = Vec::new();

        for line in script.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let output = self.execute(line)?;
            let exit = output.is_exit();
            results.push(output);
            if exit {
                break;
            }
        }

        Ok(results)
    }

    /// Run an already-parsed command.
    pub fn run(&self, command: Command) -> StoreResult<CommandOutput> {
        let keyword = command.keyword();
        let file = command.file().map(str::to_string);
        let mutation = command.is_mutation();

        let result = self.dispatch(command);
        match &result {
            Ok(_) if mutation => debug!(command = keyword, file = ?file, "applied"),
            Ok(_) => trace!(command = keyword, file = ?file, "answered"),
            Err(e) => debug!(command = keyword, file = ?file, error = %e, "rejected"),
        }
        result
    }

    fn dispatch(&self, command: Command) -> StoreResult<CommandOutput> {
        let mut registry = self.registry.lock();

        let output = match command {
            Command::Create { file } => {
                registry.create_file(&file)?;
                CommandOutput::Created { file }
            }
            Command::Read { file } => {
                let content = registry.read_file(&file)?.to_string();
                CommandOutput::Content { file, content }
            }
            Command::Insert { file, content } => {
                registry.insert(&file, &content)?;
                let current = registry.read_file(&file)?.to_string();
                CommandOutput::Inserted {
                    file,
                    inserted: content,
                    content: current,
                }
            }
            Command::Update { file, content } => {
                registry.update(&file, &content)?;
                CommandOutput::Updated { file, content }
            }
            Command::Snapshot { file, message } => {
                let version = registry.snapshot(&file, &message)?;
                CommandOutput::Snapshotted {
                    file,
                    version,
                    message,
                }
            }
            Command::Rollback { file, version } => {
                let active = registry.rollback(&file, version)?;
                let content = registry.read_file(&file)?.to_string();
                CommandOutput::RolledBack {
                    file,
                    target: version,
                    version: active,
                    content,
                }
            }
            Command::History { file } => {
                let entries = registry.history(&file)?.map(HistoryRecord::from).collect();
                CommandOutput::History { file, entries }
            }
            Command::RecentFiles { k } => CommandOutput::RecentFiles {
                files: registry.top_by_recency(k)?,
            },
            Command::BiggestTrees { k } => CommandOutput::BiggestTrees {
                files: registry.top_by_version_count(k)?,
            },
            Command::Help => CommandOutput::Help {
                text: USAGE.to_string(),
            },
            Command::Exit => CommandOutput::Exit,
        };

        Ok(output)
    }

    /// Register a new, empty file.
    pub fn create_file(&self, name: &str) -> StoreResult<()> {
        Ok(self.registry.lock().create_file(name)?)
    }

    /// Content of the active version of `name`.
    pub fn read_file(&self, name: &str) -> StoreResult<String> {
        Ok(self.registry.lock().read_file(name)?.to_string())
    }

    pub fn insert(&self, name: &str, text: &str) -> StoreResult<()> {
        Ok(self.registry.lock().insert(name, text)?)
    }

    pub fn update(&self, name: &str, text: &str) -> StoreResult<()> {
        Ok(self.registry.lock().update(name, text)?)
    }

    /// Freeze the active version of `name`; returns its id.
    pub fn snapshot(&self, name: &str, message: &str) -> StoreResult<VersionId> {
        Ok(self.registry.lock().snapshot(name, message)?)
    }

    /// Move the active version of `name`; returns the new active id.
    pub fn rollback(&self, name: &str, target: Option<VersionId>) -> StoreResult<VersionId> {
        Ok(self.registry.lock().rollback(name, target)?)
    }

    /// Snapshots on the active branch of `name`, root first.
    pub fn history(&self, name: &str) -> StoreResult<Vec<HistoryRecord>> {
        let registry = self.registry.lock();
        let history = registry.history(name)?;
        Ok(history.map(HistoryRecord::from).collect())
    }

    pub fn top_by_recency(&self, k: Option<usize>) -> StoreResult<Vec<RankEntry<DateTime<Utc>>>> {
        Ok(self.registry.lock().top_by_recency(k)?)
    }

    pub fn top_by_version_count(&self, k: Option<usize>) -> StoreResult<Vec<RankEntry<usize>>> {
        Ok(self.registry.lock().top_by_version_count(k)?)
    }

    /// Total versions of `name`.
    pub fn total_versions(&self, name: &str) -> StoreResult<usize> {
        Ok(self.registry.lock().lookup(name)?.total_versions())
    }

    /// All file names, sorted.
    pub fn files(&self) -> Vec<String> {
        self.registry
            .lock()
            .names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Get store statistics.
    pub fn stats(&self) -> StoreStats {
        self.registry.lock().stats().into()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rank::RankError;
    use crate::tree::TreeError;
    use chrono::Duration;

    fn store() -> (Store, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::epoch());
        (Store::with_clock(StoreConfig::default(), clock.clone()), clock)
    }

    #[test]
    fn test_execute_scenario() {
        let (store, _) = store();
        let results = store
            .execute_script("CREATE a\nINSERT a hi\nSNAPSHOT a v1\nUPDATE a bye\nHISTORY a")
            .unwrap();
        assert_eq!(results.len(), 5);

        match &results[4] {
            CommandOutput::History { entries, .. } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].message, "v1");
            }
            other => panic!("Expected History output, got {:?}", other),
        }
        assert_eq!(store.read_file("a").unwrap(), "bye");
        assert_eq!(store.total_versions("a").unwrap(), 3);
    }

    #[test]
    fn test_execute_errors_keep_state() {
        let (store, _) = store();
        store.execute("CREATE a").unwrap();

        let err = store.execute("CREATE a").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Registry(RegistryError::AlreadyExists(_))
        ));
        assert!(err.is_rejected());

        let err = store.execute("SNAPSHOT a again").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Registry(RegistryError::Tree(TreeError::AlreadySnapshotted { id: 0 }))
        ));
        assert_eq!(store.total_versions("a").unwrap(), 1);

        let err = store.execute("READ missing").unwrap_err();
        assert!(err.is_not_found());

        let err = store.execute("FROB a").unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "unknown command: FROB");
    }

    #[test]
    fn test_script_stops_at_exit() {
        let (store, _) = store();
        let results = store.execute_script("CREATE a\nEXIT\nCREATE b").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_exit());
        assert_eq!(store.files(), vec!["a"]);
    }

    #[test]
    fn test_rankings_through_commands() {
        let (store, clock) = store();
        store.execute("CREATE a").unwrap();
        clock.advance(Duration::seconds(1));
        store.execute("CREATE b").unwrap();
        clock.advance(Duration::seconds(1));
        store.execute("INSERT a x").unwrap();

        match store.execute("RECENT_FILES 2").unwrap() {
            CommandOutput::RecentFiles { files } => {
                assert_eq!(files[0].name, "a");
                assert_eq!(files[1].name, "b");
            }
            other => panic!("Expected RecentFiles output, got {:?}", other),
        }

        match store.execute("BIGGEST_TREES").unwrap() {
            CommandOutput::BiggestTrees { files } => {
                assert_eq!(files.len(), 2);
                assert_eq!(files[0].name, "a");
                assert_eq!(files[0].key, 2);
            }
            other => panic!("Expected BiggestTrees output, got {:?}", other),
        }

        let err = store.execute("RECENT_FILES 3").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Registry(RegistryError::Rank(RankError::KExceedsSize { .. }))
        ));
    }

    #[test]
    fn test_rollback_output() {
        let (store, _) = store();
        store.create_file("a").unwrap();
        store.update("a", "one").unwrap();
        store.snapshot("a", "first").unwrap();
        store.update("a", "two").unwrap();

        let output = store.execute("ROLLBACK a 1").unwrap();
        assert_eq!(
            output,
            CommandOutput::RolledBack {
                file: "a".into(),
                target: Some(1),
                version: 1,
                content: "one".into(),
            }
        );
        let output = store.execute("ROLLBACK a").unwrap();
        assert!(matches!(
            output,
            CommandOutput::RolledBack { target: None, version: 0, .. }
        ));
    }

    #[test]
    fn test_stats() {
        let (store, _) = store();
        store.create_file("a").unwrap();
        store.create_file("b").unwrap();
        store.insert("b", "x").unwrap();

        let stats = store.stats();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.total_versions, 3);
        assert_eq!(stats.total_snapshots, 2);
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();

        let store = Arc::new(Store::new());
        store.create_file("shared").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert("shared", &i.to_string()).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.read_file("shared").unwrap().len(), 4);
        assert_eq!(store.total_versions("shared").unwrap(), 2);
        assert_eq!(store.top_by_version_count(Some(1)).unwrap()[0].key, 2);
    }
}
