//! The file registry.
//!
//! [`FileRegistry`] maps file names to their [`VersionTree`]s and owns the
//! two rank indexes. Every mutation routed through it updates the affected
//! rankings before returning, so the trees and the rankings never disagree.
//!
//! [`VersionTree`]: crate::tree::VersionTree

mod error;
mod registry;
mod types;

pub use error::{RegistryError, RegistryResult};
pub use registry::{FileRegistry, RegistryConfig, RegistryStats};
pub use types::FileName;
