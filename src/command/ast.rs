//! Parsed commands.

use crate::tree::VersionId;

/// A single parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CREATE <file>
    Create { file: String },
    /// READ <file>
    Read { file: String },
    /// INSERT <file> [content...]
    Insert { file: String, content: String },
    /// UPDATE <file> [content...]
    Update { file: String, content: String },
    /// SNAPSHOT <file> [message...]
    Snapshot { file: String, message: String },
    /// ROLLBACK <file> [version_id]
    Rollback {
        file: String,
        version: Option<VersionId>,
    },
    /// HISTORY <file>
    History { file: String },
    /// RECENT_FILES [k]
    RecentFiles { k: Option<usize> },
    /// BIGGEST_TREES [k]
    BiggestTrees { k: Option<usize> },
    Help,
    Exit,
}

impl Command {
    /// The keyword that introduces this command.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Create { .. } => "CREATE",
            Command::Read { .. } => "READ",
            Command::Insert { .. } => "INSERT",
            Command::Update { .. } => "UPDATE",
            Command::Snapshot { .. } => "SNAPSHOT",
            Command::Rollback { .. } => "ROLLBACK",
            Command::History { .. } => "HISTORY",
            Command::RecentFiles { .. } => "RECENT_FILES",
            Command::BiggestTrees { .. } => "BIGGEST_TREES",
            Command::Help => "HELP",
            Command::Exit => "EXIT",
        }
    }

    /// The file this command targets, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Command::Create { file }
            | Command::Read { file }
            | Command::Insert { file, .. }
            | Command::Update { file, .. }
            | Command::Snapshot { file, .. }
            | Command::Rollback { file, .. }
            | Command::History { file } => Some(file),
            _ => None,
        }
    }

    /// Whether running this command can change the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Insert { .. }
                | Command::Update { .. }
                | Command::Snapshot { .. }
                | Command::Rollback { .. }
        )
    }
}

/// Usage text for every command.
pub const USAGE: &str = "\
Available commands:
  CREATE <filename>
  READ <filename>
  INSERT <filename> <content...>
  UPDATE <filename> <content...>
  SNAPSHOT <filename> [message...]
  ROLLBACK <filename> [version_id]
  HISTORY <filename>
  RECENT_FILES [k]
  BIGGEST_TREES [k]
  HELP
  EXIT";
