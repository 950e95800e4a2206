//! objectfs: mount an S3-compatible object store as a FUSE filesystem.
//!
//! The adapter core (`vfs`) reconciles POSIX file semantics with a flat
//! key/value store that only supports whole-object get/put/delete and
//! prefix listing: writes are buffered in memory and committed as a single
//! PUT on close, directories are emulated with trailing-separator marker
//! objects and delimiter listings, and metadata is served from an in-memory
//! node table. `store` holds the pluggable backends and `fuse` the rfuse3
//! bridge.

pub mod error;
pub mod fuse;
pub mod store;
pub mod vfs;
