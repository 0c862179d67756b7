//! Rankings of files by a numeric key.
//!
//! The store keeps two [`RankIndex`] instances: one keyed by last
//! modification time (RECENT_FILES) and one keyed by version count
//! (BIGGEST_TREES). Both are indexed binary max-heaps with a name to slot
//! map, so a file's key can be changed or removed in O(log n) and the top
//! k entries can be read without disturbing the index.

mod error;
mod index;

pub use error::{RankError, RankResult};
pub use index::{RankEntry, RankIndex};
