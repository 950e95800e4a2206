//! Filesystem adapter: orchestrates the node table, write buffers, path
//! translation and the object-store client.
//!
//! All operations are path-level and async. Locking discipline: the node
//! table's mutex is only held for in-memory lookups and mutations; every
//! store round trip (get/put/delete/list) happens with the lock released.

use crate::error::{BackendError, FsError, Result};
use crate::store::client::{ObjectBackend, ObjectClient};
use crate::vfs::buffer::WriteBuffer;
use crate::vfs::node::{Node, NodeAttr, NodeKind, NodeTable};
use crate::vfs::paths;
use bytes::Bytes;
use std::time::SystemTime;

/// Directory listing entry, one row of a readdir reply.
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

/// Synthetic filesystem statistics. The store has no fixed quota, so the
/// figures are large constants (the block math mirrors an 8 EB volume).
#[derive(Clone, Copy, Debug)]
pub struct StatFs {
    pub block_size: u32,
    pub fragment_size: u32,
    pub blocks: u64,
    pub blocks_free: u64,
    pub blocks_available: u64,
    pub files: u64,
    pub files_free: u64,
    pub name_max: u32,
}

impl Default for StatFs {
    fn default() -> Self {
        let frsize: u64 = 4096;
        Self {
            block_size: 4096,
            fragment_size: frsize as u32,
            blocks: (8u64 << 50) / frsize * 1024 - 1,
            blocks_free: (1u64 << 50) / frsize * 1024,
            blocks_available: (2u64 << 50) / frsize * 1024,
            files: 2_240_224,
            files_free: 1_927_486,
            name_max: 255,
        }
    }
}

/// Adapter tuning.
#[derive(Clone, Copy, Debug)]
pub struct FsConfig {
    /// Maximum bytes one write buffer may hold (0 = unlimited).
    pub max_file_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            // single-PUT commits: cap open files at 10 GiB of buffered bytes
            max_file_size: 10 * 1024 * 1024 * 1024,
        }
    }
}

/// The mounted filesystem instance: one node table, one store client.
pub struct ObjectFs<B: ObjectBackend> {
    client: ObjectClient<B>,
    table: NodeTable,
    config: FsConfig,
}

impl<B: ObjectBackend> ObjectFs<B> {
    pub fn new(client: ObjectClient<B>) -> Self {
        Self::with_config(client, FsConfig::default())
    }

    pub fn with_config(client: ObjectClient<B>, config: FsConfig) -> Self {
        Self {
            client,
            table: NodeTable::new(),
            config,
        }
    }

    pub fn backend(&self) -> &B {
        self.client.backend()
    }

    fn store_err(e: BackendError) -> FsError {
        FsError::StoreUnavailable(e)
    }

    /// Cached attributes; no store call. The root is always a directory.
    pub fn getattr(&self, path: &str) -> Result<NodeAttr> {
        let path = paths::normalize(path);
        if path == "/" {
            return Ok(NodeAttr {
                kind: NodeKind::Directory,
                size: 0,
            });
        }
        self.table.attr(&path).ok_or(FsError::NotFound(path))
    }

    /// List one directory level via prefix+delimiter and refresh the node
    /// table with every entry. A listing failure degrades to an empty view;
    /// cached entries are left untouched.
    pub async fn readdir(&self, dir_path: &str) -> Result<Vec<DirEntry>> {
        let dir_path = paths::normalize(dir_path);
        let prefix = paths::list_prefix(&dir_path);

        // listing without the table lock
        let listing = match self.client.list_objects(&prefix, "/").await {
            Ok(l) => l,
            Err(e) => {
                log::warn!("readdir {dir_path}: listing failed, serving empty view: {e}");
                return Ok(Vec::new());
            }
        };

        let mut entries = Vec::new();
        for common in &listing.common_prefixes {
            let name = paths::base_name(common);
            if name.is_empty() {
                continue;
            }
            entries.push(DirEntry {
                name: name.to_string(),
                kind: NodeKind::Directory,
                size: 0,
                last_modified: None,
            });
        }
        for obj in &listing.objects {
            // directory markers list as objects too; only plain keys are files
            if obj.key.ends_with('/') {
                continue;
            }
            entries.push(DirEntry {
                name: paths::base_name(&obj.key).to_string(),
                kind: NodeKind::File,
                size: obj.size,
                last_modified: obj.last_modified,
            });
        }

        // populate the table under the lock, after the network round trip
        for entry in &entries {
            let child = paths::join(&dir_path, &entry.name);
            let node = match entry.kind {
                NodeKind::Directory => Node::dir(),
                NodeKind::File => Node::file(entry.size),
            };
            self.table.insert(child, node);
        }
        Ok(entries)
    }

    /// Create a directory: PUT a zero-length marker object, then cache it.
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        let key = paths::to_key(&path, NodeKind::Directory);
        self.client
            .put_object(&key, b"")
            .await
            .map_err(Self::store_err)?;
        self.table.insert(path, Node::dir());
        Ok(())
    }

    /// Delete a directory's marker object. Emptiness is not verified: once
    /// child objects are gone the listing stops returning them, and callers
    /// are expected to remove children first.
    pub async fn rmdir(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        let key = paths::to_key(&path, NodeKind::Directory);
        self.client
            .delete_object(&key)
            .await
            .map_err(Self::store_err)?;
        self.table.remove(&path);
        Ok(())
    }

    /// Delete a file object. Local state is untouched on failure.
    pub async fn unlink(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        let key = paths::to_key(&path, NodeKind::File);
        self.client
            .delete_object(&key)
            .await
            .map_err(Self::store_err)?;
        self.table.remove(&path);
        Ok(())
    }

    /// Create a file entry with a fresh write buffer. No PUT happens here —
    /// an empty object would be wasted work; durability is deferred to the
    /// flush on release.
    pub fn mknod(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        if let Some(attr) = self.table.attr(&path) {
            if attr.kind == NodeKind::Directory {
                return Err(FsError::IsDirectory(path));
            }
        }
        self.table
            .replace(path, Node::created(self.config.max_file_size));
        Ok(())
    }

    /// Open an existing file for writing.
    ///
    /// With `truncate` the previous content is discarded (O_TRUNC). Otherwise
    /// the buffer is seeded with the current object body, so partial writes
    /// only change the bytes they touch and a write-free close leaves the
    /// object as it was. A path that already has an open buffer keeps it.
    pub async fn open_for_write(&self, path: &str, truncate: bool) -> Result<()> {
        let path = paths::normalize(path);
        if truncate {
            return self.truncate(&path);
        }

        enum Open {
            Ready,
            Seed(Option<Bytes>),
            IsDir,
        }
        let state = self
            .table
            .with_mut(&path, |node| {
                if node.kind == NodeKind::Directory {
                    return Open::IsDir;
                }
                if node.write.is_some() {
                    return Open::Ready;
                }
                Open::Seed(node.read.clone())
            })
            .ok_or_else(|| FsError::NotFound(path.clone()))?;

        let body = match state {
            Open::Ready => return Ok(()),
            Open::IsDir => return Err(FsError::IsDirectory(path)),
            Open::Seed(Some(cached)) => cached.to_vec(),
            Open::Seed(None) => {
                // materialize the committed content before accepting writes
                let key = paths::to_key(&path, NodeKind::File);
                self.client
                    .get_object(&key)
                    .await
                    .map_err(Self::store_err)?
                    .unwrap_or_default()
            }
        };

        self.table
            .with_mut(&path, |node| {
                if node.write.is_none() {
                    node.size = body.len() as u64;
                    node.write = Some(WriteBuffer::from_bytes(body, self.config.max_file_size));
                }
            })
            .ok_or(FsError::NotFound(path))?;
        Ok(())
    }

    /// Buffer a write at `offset`. Requires an open write buffer on the
    /// path; the node's size tracks the buffer length.
    pub async fn write(&self, path: &str, data: &[u8], offset: i64) -> Result<usize> {
        let path = paths::normalize(path);
        self.table
            .with_mut(&path, |node| {
                if node.kind == NodeKind::Directory {
                    return Err(FsError::IsDirectory(path.clone()));
                }
                let Some(buf) = node.write.as_mut() else {
                    return Err(FsError::NoSuchHandle(path.clone()));
                };
                let n = buf.write_at(data, offset)?;
                node.size = buf.len() as u64;
                Ok(n)
            })
            .unwrap_or_else(|| Err(FsError::NoSuchHandle(path.clone())))
    }

    /// Read up to `len` bytes at `offset`.
    ///
    /// An open write buffer is authoritative (the object does not exist yet,
    /// or is stale, until the flush). Otherwise the full body is fetched once
    /// per open handle and cached on the node, and every read is served by
    /// slicing the cached body at the requested offset. Reading at or past
    /// the end returns an empty result.
    pub async fn read(&self, path: &str, offset: u64, len: usize) -> Result<Vec<u8>> {
        let path = paths::normalize(path);

        enum Hit {
            Data(Vec<u8>),
            NeedFetch,
            IsDir,
        }
        // fast path under the lock: buffered writes or an already-cached body
        let hit = self
            .table
            .with_mut(&path, |node| {
                if node.kind == NodeKind::Directory {
                    return Hit::IsDir;
                }
                if let Some(buf) = node.write.as_ref() {
                    return Hit::Data(slice_at(buf.bytes(), offset, len));
                }
                if let Some(body) = node.read.as_ref() {
                    return Hit::Data(slice_at(body, offset, len));
                }
                Hit::NeedFetch
            })
            .ok_or_else(|| FsError::NotFound(path.clone()))?;

        match hit {
            Hit::Data(out) => return Ok(out),
            Hit::IsDir => return Err(FsError::IsDirectory(path)),
            Hit::NeedFetch => {}
        }

        // one full GET per open handle, outside the lock
        let key = paths::to_key(&path, NodeKind::File);
        let body = self
            .client
            .get_object(&key)
            .await
            .map_err(Self::store_err)?
            .ok_or_else(|| FsError::NotFound(path.clone()))?;
        let body = Bytes::from(body);
        let out = slice_at(&body, offset, len);
        self.table.with_mut(&path, |node| {
            node.size = body.len() as u64;
            node.read = Some(body.clone());
        });
        Ok(out)
    }

    /// Close a path. A dirty write buffer (any write landed, or the file was
    /// truncated) is committed with exactly one PUT; this is the single point
    /// where buffered writes become durable, and a truncate commits the
    /// zero-length object here. On a failed PUT the buffer is restored so a
    /// retry can re-flush with no data loss. A clean or absent buffer makes
    /// this a read-handle release: the buffer and cached body are dropped and
    /// the committed state stands.
    pub async fn release(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        let buf = self.table.take_write_buffer(&path);

        match buf {
            Some(buf) if buf.is_dirty() => {
                let key = paths::to_key(&path, NodeKind::File);
                match self.client.put_object(&key, buf.bytes()).await {
                    Ok(()) => {
                        self.table.with_mut(&path, |node| {
                            node.size = buf.len() as u64;
                            // the cached body (if any) predates this commit
                            node.read = None;
                        });
                        Ok(())
                    }
                    Err(e) => {
                        self.table.restore_write_buffer(&path, buf);
                        Err(Self::store_err(e))
                    }
                }
            }
            _ => {
                // nothing to flush; drop the cached read body
                self.table.with_mut(&path, |node| {
                    node.read = None;
                });
                Ok(())
            }
        }
    }

    /// Rename via get+put+delete on the store key (object stores have no
    /// native rename), then move the node table entry. Applies to the single
    /// key for the path's kind; children of a renamed directory are not
    /// rewritten.
    pub async fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        let old_path = paths::normalize(old_path);
        let new_path = paths::normalize(new_path);
        let attr = self
            .table
            .attr(&old_path)
            .ok_or_else(|| FsError::NotFound(old_path.clone()))?;

        let old_key = paths::to_key(&old_path, attr.kind);
        let new_key = paths::to_key(&new_path, attr.kind);

        let body = self
            .client
            .get_object(&old_key)
            .await
            .map_err(Self::store_err)?
            .ok_or_else(|| FsError::NotFound(old_path.clone()))?;
        self.client
            .put_object(&new_key, &body)
            .await
            .map_err(Self::store_err)?;
        self.client
            .delete_object(&old_key)
            .await
            .map_err(Self::store_err)?;

        self.table.rename(&old_path, &new_path);
        Ok(())
    }

    /// Truncate a file to zero (the kernel's O_TRUNC / setattr path). The
    /// buffer is marked dirty so the close commits the zero-length object
    /// even if nothing else is written.
    pub fn truncate(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        self.table
            .with_mut(&path, |node| {
                if node.kind == NodeKind::Directory {
                    return Err(FsError::IsDirectory(path.clone()));
                }
                let mut buf = WriteBuffer::new(0, self.config.max_file_size);
                buf.mark_dirty();
                node.write = Some(buf);
                node.read = None;
                node.size = 0;
                Ok(())
            })
            .unwrap_or_else(|| Err(FsError::NotFound(path.clone())))
    }

    /// Synthetic capacity figures; the store has no quota to report.
    pub fn statfs(&self) -> StatFs {
        StatFs::default()
    }
}

fn slice_at(body: &[u8], offset: u64, len: usize) -> Vec<u8> {
    let start = (offset as usize).min(body.len());
    let end = (start + len).min(body.len());
    body[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryBackend;

    fn new_fs() -> ObjectFs<InMemoryBackend> {
        ObjectFs::new(ObjectClient::new(InMemoryBackend::new()))
    }

    #[tokio::test]
    async fn create_write_release_is_one_put() {
        let fs = new_fs();
        fs.mknod("/a.txt").unwrap();
        assert_eq!(fs.write("/a.txt", b"hello", 0).await.unwrap(), 5);
        fs.release("/a.txt").await.unwrap();

        assert_eq!(fs.backend().puts(), 1);
        assert_eq!(fs.backend().object("a.txt").unwrap(), b"hello");
        let attr = fs.getattr("/a.txt").unwrap();
        assert_eq!(attr.kind, NodeKind::File);
        assert_eq!(attr.size, 5);
    }

    #[tokio::test]
    async fn round_trip_read_back() {
        let fs = new_fs();
        fs.mknod("/r.bin").unwrap();
        let payload: Vec<u8> = (0..200u8).collect();
        fs.write("/r.bin", &payload, 0).await.unwrap();
        fs.release("/r.bin").await.unwrap();

        let out = fs.read("/r.bin", 0, payload.len()).await.unwrap();
        assert_eq!(out, payload);
    }

    #[tokio::test]
    async fn sparse_write_zero_fills() {
        let fs = new_fs();
        fs.mknod("/sparse").unwrap();
        fs.write("/sparse", b"tail!", 10).await.unwrap();
        assert_eq!(fs.getattr("/sparse").unwrap().size, 15);
        fs.release("/sparse").await.unwrap();

        let body = fs.backend().object("sparse").unwrap();
        assert_eq!(body.len(), 15);
        assert!(body[..10].iter().all(|&b| b == 0));
        assert_eq!(&body[10..], b"tail!");
    }

    #[tokio::test]
    async fn write_without_handle_fails() {
        let fs = new_fs();
        fs.backend().put_object("x", b"existing").await.unwrap();
        fs.readdir("/").await.unwrap();
        let err = fs.write("/x", b"data", 0).await.unwrap_err();
        assert!(matches!(err, FsError::NoSuchHandle(_)));
    }

    #[tokio::test]
    async fn mkdir_puts_marker_and_lists() {
        let fs = new_fs();
        fs.mkdir("/d").await.unwrap();
        assert_eq!(fs.backend().puts(), 1);
        assert_eq!(fs.backend().object("d/").unwrap(), b"");

        let entries = fs.readdir("/").await.unwrap();
        assert!(
            entries
                .iter()
                .any(|e| e.name == "d" && e.kind == NodeKind::Directory)
        );
        assert_eq!(fs.getattr("/d").unwrap().kind, NodeKind::Directory);
    }

    #[tokio::test]
    async fn readdir_is_idempotent() {
        let fs = new_fs();
        fs.mkdir("/d").await.unwrap();
        fs.backend().put_object("f.txt", b"abc").await.unwrap();
        fs.backend().put_object("d/in.txt", b"1").await.unwrap();

        let collect = |entries: Vec<DirEntry>| {
            let mut v: Vec<_> = entries
                .into_iter()
                .map(|e| (e.name, e.kind == NodeKind::Directory, e.size))
                .collect();
            v.sort();
            v
        };
        let a = collect(fs.readdir("/").await.unwrap());
        let b = collect(fs.readdir("/").await.unwrap());
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[tokio::test]
    async fn same_name_file_and_dir_coexist() {
        let fs = new_fs();
        fs.backend().put_object("x", b"file-body").await.unwrap();
        fs.backend().put_object("x/", b"").await.unwrap();

        let entries = fs.readdir("/").await.unwrap();
        let dirs = entries
            .iter()
            .filter(|e| e.name == "x" && e.kind == NodeKind::Directory)
            .count();
        let files: Vec<_> = entries
            .iter()
            .filter(|e| e.name == "x" && e.kind == NodeKind::File)
            .collect();
        assert_eq!(dirs, 1);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 9);

        // a second pass classifies identically
        let again = fs.readdir("/").await.unwrap();
        assert_eq!(again.len(), entries.len());
    }

    #[tokio::test]
    async fn read_is_offset_correct_and_cached() {
        let fs = new_fs();
        fs.backend()
            .put_object("song.txt", b"do-re-mi-fa-sol")
            .await
            .unwrap();
        fs.readdir("/").await.unwrap();

        assert_eq!(fs.read("/song.txt", 3, 5).await.unwrap(), b"re-mi");
        assert_eq!(fs.read("/song.txt", 0, 2).await.unwrap(), b"do");
        // past EOF: empty, not an error
        assert_eq!(fs.read("/song.txt", 100, 4).await.unwrap(), b"");
        // one full fetch served all three reads
        assert_eq!(
            fs.backend()
                .get_count
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn open_buffer_reads_back_unflushed_bytes() {
        let fs = new_fs();
        fs.mknod("/draft").unwrap();
        fs.write("/draft", b"unflushed", 0).await.unwrap();
        assert_eq!(fs.read("/draft", 2, 5).await.unwrap(), b"flush");
        // nothing fetched, nothing stored yet
        assert_eq!(fs.backend().puts(), 0);
    }

    #[tokio::test]
    async fn failed_flush_preserves_buffer_for_retry() {
        let fs = new_fs();
        fs.mknod("/risky").unwrap();
        fs.write("/risky", b"precious", 0).await.unwrap();

        fs.backend().set_fail_puts(true);
        let err = fs.release("/risky").await.unwrap_err();
        assert!(matches!(err, FsError::StoreUnavailable(_)));
        assert_eq!(fs.getattr("/risky").unwrap().size, 8);

        fs.backend().set_fail_puts(false);
        fs.release("/risky").await.unwrap();
        assert_eq!(fs.backend().object("risky").unwrap(), b"precious");
    }

    #[tokio::test]
    async fn listing_failure_degrades_to_empty_view() {
        let fs = new_fs();
        fs.backend().put_object("keep.txt", b"k").await.unwrap();
        fs.readdir("/").await.unwrap();

        fs.backend().set_fail_lists(true);
        let entries = fs.readdir("/").await.unwrap();
        assert!(entries.is_empty());
        // cache entries survive the failure
        assert_eq!(fs.getattr("/keep.txt").unwrap().size, 1);
    }

    #[tokio::test]
    async fn rename_moves_object_and_node() {
        let fs = new_fs();
        fs.mknod("/a.txt").unwrap();
        fs.write("/a.txt", b"hello", 0).await.unwrap();
        fs.release("/a.txt").await.unwrap();

        fs.rename("/a.txt", "/b.txt").await.unwrap();
        assert!(matches!(fs.getattr("/a.txt"), Err(FsError::NotFound(_))));
        assert_eq!(fs.getattr("/b.txt").unwrap().size, 5);
        assert!(fs.backend().object("a.txt").is_none());
        assert_eq!(fs.backend().object("b.txt").unwrap(), b"hello");
    }

    #[tokio::test]
    async fn rename_directory_moves_marker() {
        let fs = new_fs();
        fs.mkdir("/old").await.unwrap();
        fs.rename("/old", "/new").await.unwrap();
        assert!(fs.backend().object("old/").is_none());
        assert_eq!(fs.backend().object("new/").unwrap(), b"");
        assert_eq!(fs.getattr("/new").unwrap().kind, NodeKind::Directory);
    }

    #[tokio::test]
    async fn unlink_and_rmdir_remove_key_and_node() {
        let fs = new_fs();
        fs.mkdir("/d").await.unwrap();
        fs.mknod("/d/f").unwrap();
        fs.write("/d/f", b"1", 0).await.unwrap();
        fs.release("/d/f").await.unwrap();

        fs.unlink("/d/f").await.unwrap();
        assert!(fs.backend().object("d/f").is_none());
        assert!(fs.getattr("/d/f").is_err());

        fs.rmdir("/d").await.unwrap();
        assert!(fs.backend().object("d/").is_none());
        assert!(fs.getattr("/d").is_err());
    }

    #[tokio::test]
    async fn empty_release_clears_read_handle_only() {
        let fs = new_fs();
        fs.backend().put_object("ro.txt", b"body").await.unwrap();
        fs.readdir("/").await.unwrap();
        fs.read("/ro.txt", 0, 4).await.unwrap();

        fs.release("/ro.txt").await.unwrap();
        // only the seed put happened; the next read re-fetches
        assert_eq!(fs.backend().puts(), 1);
        fs.read("/ro.txt", 0, 4).await.unwrap();
        assert_eq!(
            fs.backend()
                .get_count
                .load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn write_open_without_writes_preserves_content() {
        let fs = new_fs();
        fs.backend()
            .put_object("f.txt", b"important data")
            .await
            .unwrap();
        fs.readdir("/").await.unwrap();

        fs.open_for_write("/f.txt", false).await.unwrap();
        // the seeded buffer serves reads while the handle is open
        assert_eq!(fs.read("/f.txt", 0, 14).await.unwrap(), b"important data");
        fs.release("/f.txt").await.unwrap();

        // a write-free close touches nothing: only the seed put happened
        assert_eq!(fs.backend().puts(), 1);
        assert_eq!(fs.backend().object("f.txt").unwrap(), b"important data");
        assert_eq!(fs.getattr("/f.txt").unwrap().size, 14);

        // and a later refresh still reports the committed size
        fs.readdir("/").await.unwrap();
        assert_eq!(fs.getattr("/f.txt").unwrap().size, 14);
        assert_eq!(fs.read("/f.txt", 10, 4).await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn write_open_updates_in_place() {
        let fs = new_fs();
        fs.backend().put_object("log", b"0123456789").await.unwrap();
        fs.readdir("/").await.unwrap();

        fs.open_for_write("/log", false).await.unwrap();
        fs.write("/log", b"ABCD", 10).await.unwrap();
        fs.write("/log", b"xx", 2).await.unwrap();
        fs.release("/log").await.unwrap();

        assert_eq!(fs.backend().object("log").unwrap(), b"01xx456789ABCD");
        assert_eq!(fs.getattr("/log").unwrap().size, 14);
    }

    #[tokio::test]
    async fn truncating_open_commits_empty_object() {
        let fs = new_fs();
        fs.backend().put_object("f.txt", b"old bytes").await.unwrap();
        fs.readdir("/").await.unwrap();

        fs.open_for_write("/f.txt", true).await.unwrap();
        assert_eq!(fs.getattr("/f.txt").unwrap().size, 0);
        fs.release("/f.txt").await.unwrap();

        assert_eq!(fs.backend().object("f.txt").unwrap(), b"");
        assert_eq!(fs.getattr("/f.txt").unwrap().size, 0);
    }

    #[tokio::test]
    async fn truncate_then_close_commits_empty_object() {
        let fs = new_fs();
        fs.backend().put_object("f.txt", b"old bytes").await.unwrap();
        fs.readdir("/").await.unwrap();

        fs.truncate("/f.txt").unwrap();
        fs.release("/f.txt").await.unwrap();
        assert_eq!(fs.backend().object("f.txt").unwrap(), b"");
    }

    #[tokio::test]
    async fn statfs_reports_synthetic_capacity() {
        let fs = new_fs();
        let st = fs.statfs();
        assert_eq!(st.block_size, 4096);
        assert_eq!(st.name_max, 255);
        assert!(st.blocks > st.blocks_available);
    }

    #[tokio::test]
    async fn buffer_capacity_limit_is_enforced() {
        let fs = ObjectFs::with_config(
            ObjectClient::new(InMemoryBackend::new()),
            FsConfig { max_file_size: 16 },
        );
        fs.mknod("/small").unwrap();
        fs.write("/small", b"0123456789", 0).await.unwrap();
        let err = fs.write("/small", b"abcdef", 10).await.unwrap_err();
        assert!(matches!(err, FsError::OutOfRange(_)));
        // the failed write did not mutate the buffer
        assert_eq!(fs.getattr("/small").unwrap().size, 10);
    }
}
