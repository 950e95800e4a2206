//! Adapter core: write buffering, the node table, path/key translation and
//! the path-level filesystem operations built on them.

pub mod buffer;
pub mod fs;
pub mod node;
pub mod paths;
