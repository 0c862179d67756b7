//! verstore - an in-memory versioned file store
//!
//! Every file is a branchable tree of versions. Open versions are edited in
//! place; snapshotting freezes a version, after which the next edit branches
//! a new child. Rollback moves the active version anywhere in the tree, and
//! two live rankings (most recently modified, most versions) follow every
//! change.
//!
//! # Example
//!
//! ```
//! use verstore::store::Store;
//!
//! let store = Store::new();
//! store.create_file("notes").unwrap();
//! store.insert("notes", "hi").unwrap();
//! store.snapshot("notes", "v1").unwrap();
//! store.update("notes", "bye").unwrap();
//!
//! assert_eq!(store.read_file("notes").unwrap(), "bye");
//! assert_eq!(store.history("notes").unwrap().len(), 2);
//! ```

pub mod clock;
pub mod command;
pub mod rank;
pub mod registry;
pub mod store;
pub mod tree;
