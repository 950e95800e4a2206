//! Node Table: the in-memory metadata/handle cache.
//!
//! One entry per known filesystem path, populated lazily by readdir and by
//! create operations. The table is owned by the adapter instance (one table
//! per mounted filesystem, no process-wide state) and guarded by a map-level
//! mutex. The lock is only ever held for in-memory reads/mutations — store
//! round trips happen outside it. Entries are never expired; staleness
//! against concurrent external mutation of the bucket is an accepted
//! limitation of this cache.

use crate::vfs::buffer::WriteBuffer;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Attributes served to getattr, copied out of the table.
#[derive(Clone, Copy, Debug)]
pub struct NodeAttr {
    pub kind: NodeKind,
    pub size: u64,
}

/// Cached representation of one filesystem entry.
///
/// At most one write buffer exists per path, and directory nodes never hold
/// a write buffer or read body. A file's `size` tracks the buffer length
/// while one is open, else the last known committed size.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub size: u64,
    pub write: Option<WriteBuffer>,
    pub read: Option<Bytes>,
}

impl Node {
    pub fn file(size: u64) -> Self {
        Self {
            kind: NodeKind::File,
            size,
            write: None,
            read: None,
        }
    }

    pub fn dir() -> Self {
        Self {
            kind: NodeKind::Directory,
            size: 0,
            write: None,
            read: None,
        }
    }

    /// Freshly created file with an open write buffer (mknod).
    pub fn created(max_size: usize) -> Self {
        Self {
            kind: NodeKind::File,
            size: 0,
            write: Some(WriteBuffer::new(0, max_size)),
            read: None,
        }
    }

    pub fn attr(&self) -> NodeAttr {
        NodeAttr {
            kind: self.kind,
            size: self.size,
        }
    }
}

/// Lock-guarded path→node map.
#[derive(Default)]
pub struct NodeTable {
    nodes: Mutex<HashMap<String, Node>>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(&self, path: &str) -> Option<NodeAttr> {
        self.nodes.lock().unwrap().get(path).map(Node::attr)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    /// Idempotent overwrite, except that refreshing an entry (readdir) must
    /// not clobber open handles: an existing node keeps its buffer/body and
    /// only adopts the new size when it has no open write buffer.
    pub fn insert(&self, path: impl Into<String>, node: Node) {
        let mut nodes = self.nodes.lock().unwrap();
        let path = path.into();
        match nodes.get_mut(&path) {
            Some(existing) if existing.kind == node.kind => {
                if existing.write.is_none() {
                    existing.size = node.size;
                }
            }
            _ => {
                nodes.insert(path, node);
            }
        }
    }

    /// Unconditional replace, for create/rename targets.
    pub fn replace(&self, path: impl Into<String>, node: Node) {
        self.nodes.lock().unwrap().insert(path.into(), node);
    }

    pub fn remove(&self, path: &str) -> Option<Node> {
        self.nodes.lock().unwrap().remove(path)
    }

    /// Move the entry at `old` to `new` (rename). Returns false if `old` is
    /// not present.
    pub fn rename(&self, old: &str, new: &str) -> bool {
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.remove(old) {
            Some(node) => {
                nodes.insert(new.to_string(), node);
                true
            }
            None => false,
        }
    }

    /// Run `f` on the node at `path` under the table lock. `f` must not
    /// block; store calls are issued outside the lock.
    pub fn with_mut<R>(&self, path: &str, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        self.nodes.lock().unwrap().get_mut(path).map(f)
    }

    /// Detach the write buffer for flushing; restored on a failed PUT via
    /// [`NodeTable::restore_write_buffer`].
    pub fn take_write_buffer(&self, path: &str) -> Option<WriteBuffer> {
        self.nodes
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|n| n.write.take())
    }

    pub fn restore_write_buffer(&self, path: &str, buf: WriteBuffer) {
        if let Some(node) = self.nodes.lock().unwrap().get_mut(path) {
            node.size = buf.len() as u64;
            node.write = Some(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_refresh_keeps_open_buffer() {
        let table = NodeTable::new();
        table.replace("/a.txt", Node::created(0));
        table.with_mut("/a.txt", |n| {
            n.write.as_mut().unwrap().write_at(b"abc", 0).unwrap();
            n.size = 3;
        });

        // a readdir refresh reporting the committed (stale) size
        table.insert("/a.txt", Node::file(0));
        let attr = table.attr("/a.txt").unwrap();
        assert_eq!(attr.size, 3);
        assert!(table.with_mut("/a.txt", |n| n.write.is_some()).unwrap());
    }

    #[test]
    fn rename_moves_entry() {
        let table = NodeTable::new();
        table.replace("/a", Node::file(5));
        assert!(table.rename("/a", "/b"));
        assert!(table.attr("/a").is_none());
        assert_eq!(table.attr("/b").unwrap().size, 5);
        assert!(!table.rename("/missing", "/c"));
    }

    #[test]
    fn take_and_restore_buffer() {
        let table = NodeTable::new();
        table.replace("/f", Node::created(0));
        table.with_mut("/f", |n| {
            n.write.as_mut().unwrap().write_at(b"data", 0).unwrap()
        });

        let buf = table.take_write_buffer("/f").unwrap();
        assert!(table.take_write_buffer("/f").is_none());
        table.restore_write_buffer("/f", buf);
        assert_eq!(table.attr("/f").unwrap().size, 4);
    }
}
