//! High-level store API and REPL interface.
//!
//! This module wraps the registry in a thread-safe [`Store`], runs parsed
//! commands against it, and provides the interactive [`Repl`].

mod api;
mod output;
mod repl;

pub use api::{Store, StoreConfig, StoreError, StoreResult, StoreStats};
pub use output::{format_time, CommandOutput, HistoryRecord};
pub use repl::{Repl, ReplConfig};
