//! Command results and their text rendering.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::rank::RankEntry;
use crate::tree::{HistoryEntry, VersionId};

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutput {
    Created {
        file: String,
    },
    Content {
        file: String,
        content: String,
    },
    Inserted {
        file: String,
        inserted: String,
        content: String,
    },
    Updated {
        file: String,
        content: String,
    },
    Snapshotted {
        file: String,
        version: VersionId,
        message: String,
    },
    RolledBack {
        file: String,
        /// Explicit target, or `None` for a move to the parent.
        target: Option<VersionId>,
        version: VersionId,
        content: String,
    },
    History {
        file: String,
        entries: Vec<HistoryRecord>,
    },
    RecentFiles {
        files: Vec<RankEntry<DateTime<Utc>>>,
    },
    BiggestTrees {
        files: Vec<RankEntry<usize>>,
    },
    Help {
        text: String,
    },
    Exit,
}

impl CommandOutput {
    /// true for the output of EXIT
    pub fn is_exit(&self) -> bool {
        matches!(self, CommandOutput::Exit)
    }
}

/// Owned copy of a [`HistoryEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub id: VersionId,
    pub created_at: DateTime<Utc>,
    pub snapshot_at: DateTime<Utc>,
    pub message: String,
}

impl From<HistoryEntry<'_>> for HistoryRecord {
    fn from(entry: HistoryEntry<'_>) -> Self {
        Self {
            id: entry.id,
            created_at: entry.created_at,
            snapshot_at: entry.snapshot_at,
            message: entry.message.to_string(),
        }
    }
}

/// Render a timestamp for display.
pub fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Created { file } => write!(f, "[CREATE] File created: {}", file),
            CommandOutput::Content { file, content } => {
                write!(f, "[READ] Content of file '{}':\n{}", file, content)
            }
            CommandOutput::Inserted {
                file,
                inserted,
                content,
            } => write!(
                f,
                "[INSERT] Content inserted into file '{}':\n{}\nCurrent content:\n{}",
                file, inserted, content
            ),
            CommandOutput::Updated { file, content } => write!(
                f,
                "[UPDATE] Content updated in file '{}'.\nCurrent content:\n{}",
                file, content
            ),
            CommandOutput::Snapshotted {
                file,
                version,
                message,
            } => {
                write!(
                    f,
                    "[SNAPSHOT] Snapshot created for file '{}' (version {}).",
                    file, version
                )?;
                if !message.is_empty() {
                    write!(f, "\nMessage: {}", message)?;
                }
                Ok(())
            }
            CommandOutput::RolledBack {
                file,
                target,
                version,
                content,
            } => {
                match target {
                    Some(_) => write!(
                        f,
                        "[ROLLBACK] File '{}' rolled back to version {}.",
                        file, version
                    )?,
                    None => write!(
                        f,
                        "[ROLLBACK] File '{}' rolled back to previous version ({}).",
                        file, version
                    )?,
                }
                write!(f, "\nCurrent content:\n{}", content)
            }
            CommandOutput::History { file, entries } => {
                write!(f, "[HISTORY] Snapshots for file '{}':", file)?;
                if entries.is_empty() {
                    return write!(f, "\n(no snapshots yet)");
                }
                for entry in entries {
                    write!(
                        f,
                        "\nVersion {}\n | Created: {} | Snapshot: {} | Message: {}",
                        entry.id,
                        format_time(entry.created_at),
                        format_time(entry.snapshot_at),
                        entry.message
                    )?;
                }
                Ok(())
            }
            CommandOutput::RecentFiles { files } => {
                write!(f, "[RECENT_FILES] Showing {} file(s):", files.len())?;
                for entry in files {
                    write!(f, "\n{} -> {}", entry.name, format_time(entry.key))?;
                }
                Ok(())
            }
            CommandOutput::BiggestTrees { files } => {
                write!(
                    f,
                    "[BIGGEST_TREES] Showing {} file(s) by version count:",
                    files.len()
                )?;
                for entry in files {
                    write!(f, "\n{} -> {}", entry.key, entry.name)?;
                }
                Ok(())
            }
            CommandOutput::Help { text } => write!(f, "{}", text),
            CommandOutput::Exit => write!(f, "Exiting..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_history() {
        let output = CommandOutput::History {
            file: "a".into(),
            entries: vec![HistoryRecord {
                id: 0,
                created_at: DateTime::UNIX_EPOCH,
                snapshot_at: DateTime::UNIX_EPOCH,
                message: String::new(),
            }],
        };
        let text = output.to_string();
        assert!(text.starts_with("[HISTORY] Snapshots for file 'a':"));
        assert!(text.contains("Version 0"));
        assert!(text.contains("1970-01-01T00:00:00.000Z"));

        let empty = CommandOutput::History {
            file: "a".into(),
            entries: Vec::new(),
        };
        assert!(empty.to_string().ends_with("(no snapshots yet)"));
    }

    #[test]
    fn test_render_rankings() {
        let output = CommandOutput::BiggestTrees {
            files: vec![
                RankEntry {
                    name: "big".into(),
                    key: 4,
                },
                RankEntry {
                    name: "small".into(),
                    key: 1,
                },
            ],
        };
        assert_eq!(
            output.to_string(),
            "[BIGGEST_TREES] Showing 2 file(s) by version count:\n4 -> big\n1 -> small"
        );
    }

    #[test]
    fn test_render_snapshot_message() {
        let with = CommandOutput::Snapshotted {
            file: "a".into(),
            version: 2,
            message: "done".into(),
        };
        assert!(with.to_string().ends_with("\nMessage: done"));

        let without = CommandOutput::Snapshotted {
            file: "a".into(),
            version: 2,
            message: String::new(),
        };
        assert!(!without.to_string().contains("Message"));
    }

    #[test]
    fn test_json_shape() {
        let output = CommandOutput::Created { file: "a".into() };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "created", "file": "a"}));

        let exit = serde_json::to_value(CommandOutput::Exit).unwrap();
        assert_eq!(exit, serde_json::json!({"kind": "exit"}));
    }
}
