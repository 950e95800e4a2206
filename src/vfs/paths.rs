//! Path canonicalization and path→object-key translation.
//!
//! Filesystem paths are absolute and `/`-separated; store keys drop the
//! leading separator, and directory keys carry a trailing separator so
//! marker objects stay distinct from same-named files and delimiter listing
//! splits the two namespaces naturally.

use crate::vfs::node::NodeKind;

pub const SEPARATOR: char = '/';

/// Canonical absolute path: collapse repeated separators, drop trailing ones.
/// The empty string and `/` both normalize to `/`.
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
    let mut out = String::from("/");
    out.push_str(&parts.join("/"));
    out
}

/// Split a canonical path into `(parent, name)`.
pub fn split_dir_file(path: &str) -> (String, String) {
    let n = path.rfind(SEPARATOR).unwrap_or(0);
    if n == 0 {
        ("/".to_string(), path[1..].to_string())
    } else {
        (path[..n].to_string(), path[n + 1..].to_string())
    }
}

/// Final path component.
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or("")
}

/// Object-store key for a path: leading separator stripped, trailing
/// separator appended for directories.
pub fn to_key(path: &str, kind: NodeKind) -> String {
    let stripped = path.trim_start_matches(SEPARATOR);
    match kind {
        NodeKind::File => stripped.to_string(),
        NodeKind::Directory => format!("{stripped}/"),
    }
}

/// Listing prefix for one directory level: the directory key, or the empty
/// prefix for the root.
pub fn list_prefix(dir_path: &str) -> String {
    let path = normalize(dir_path);
    if path == "/" {
        String::new()
    } else {
        to_key(&path, NodeKind::Directory)
    }
}

/// Child path under a directory (root avoids doubling the separator).
pub fn join(dir_path: &str, name: &str) -> String {
    if dir_path == "/" {
        format!("/{name}")
    } else {
        format!("{dir_path}/{name}")
    }
}
