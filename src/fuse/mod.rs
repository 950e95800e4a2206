//! FUSE bridge: exposes an [`ObjectFs`] through rfuse3.
//!
//! The kernel addresses everything by inode while the adapter core is
//! path-addressed, so this layer keeps a bidirectional inode↔path table and
//! translates each callback into the corresponding path-level operation,
//! mapping [`FsError`] variants onto negative POSIX codes.

pub mod mount;

use crate::error::FsError;
use crate::store::client::ObjectBackend;
use crate::vfs::fs::ObjectFs;
use crate::vfs::node::{NodeAttr, NodeKind};
use crate::vfs::paths;
use bytes::Bytes;
use futures_util::stream::{self, Stream};
use rfuse3::Result as FuseResult;
use rfuse3::raw::reply::{
    DirectoryEntry, DirectoryEntryPlus, ReplyAttr, ReplyCreated, ReplyData, ReplyDirectory,
    ReplyDirectoryPlus, ReplyEntry, ReplyInit, ReplyOpen, ReplyStatFs, ReplyWrite,
};
use rfuse3::raw::{Filesystem, Request};
use rfuse3::{FileType as FuseFileType, SetAttr, Timestamp};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

const ROOT_INO: u64 = 1;
const TTL: Duration = Duration::from_secs(1);

/// Bidirectional inode↔path map. Inodes are allocated on first sight of a
/// path and stay stable until the path is removed, renamed away, or the
/// kernel drops its last lookup reference (`forget`).
struct InoTable {
    paths: HashMap<u64, String>,
    inos: HashMap<String, u64>,
    lookups: HashMap<u64, u64>,
    next: u64,
}

impl InoTable {
    fn new() -> Self {
        let mut t = Self {
            paths: HashMap::new(),
            inos: HashMap::new(),
            lookups: HashMap::new(),
            next: ROOT_INO + 1,
        };
        t.paths.insert(ROOT_INO, "/".to_string());
        t.inos.insert("/".to_string(), ROOT_INO);
        t
    }

    fn ino_for(&mut self, path: &str) -> u64 {
        if let Some(&ino) = self.inos.get(path) {
            return ino;
        }
        let ino = self.next;
        self.next += 1;
        self.paths.insert(ino, path.to_string());
        self.inos.insert(path.to_string(), ino);
        ino
    }

    /// Count one kernel lookup reference against `ino` (lookup, create and
    /// readdirplus replies all hand the kernel a reference).
    fn note_lookup(&mut self, ino: u64) {
        *self.lookups.entry(ino).or_insert(0) += 1;
    }

    /// Drop `nlookup` kernel references; the mapping is evicted once the
    /// count reaches zero. The root is never evicted.
    fn forget(&mut self, ino: u64, nlookup: u64) {
        if ino == ROOT_INO {
            return;
        }
        let Some(count) = self.lookups.get_mut(&ino) else {
            return;
        };
        *count = count.saturating_sub(nlookup);
        if *count == 0 {
            self.lookups.remove(&ino);
            if let Some(path) = self.paths.remove(&ino) {
                self.inos.remove(&path);
            }
        }
    }

    fn path_of(&self, ino: u64) -> Option<String> {
        self.paths.get(&ino).cloned()
    }

    fn remove(&mut self, path: &str) {
        if let Some(ino) = self.inos.remove(path) {
            self.paths.remove(&ino);
            self.lookups.remove(&ino);
        }
    }

    /// Remap `old` and every descendant path under it to the `new` prefix,
    /// keeping inode numbers stable.
    fn rename(&mut self, old: &str, new: &str) {
        let old_prefix = format!("{old}/");
        let moved: Vec<(u64, String)> = self
            .paths
            .iter()
            .filter(|(_, p)| p.as_str() == old || p.starts_with(&old_prefix))
            .map(|(ino, p)| (*ino, p.clone()))
            .collect();
        for (ino, p) in moved {
            let renamed = format!("{new}{}", &p[old.len()..]);
            self.inos.remove(&p);
            self.inos.insert(renamed.clone(), ino);
            self.paths.insert(ino, renamed);
        }
    }
}

/// rfuse3-facing filesystem wrapping the path-level adapter.
pub struct FuseFs<B: ObjectBackend> {
    fs: ObjectFs<B>,
    inodes: Mutex<InoTable>,
}

impl<B: ObjectBackend> FuseFs<B> {
    pub fn new(fs: ObjectFs<B>) -> Self {
        Self {
            fs,
            inodes: Mutex::new(InoTable::new()),
        }
    }

    pub fn inner(&self) -> &ObjectFs<B> {
        &self.fs
    }

    fn path_of(&self, ino: u64) -> Option<String> {
        self.inodes.lock().unwrap().path_of(ino)
    }

    fn ino_for(&self, path: &str) -> u64 {
        self.inodes.lock().unwrap().ino_for(path)
    }

    /// Allocate (or reuse) the inode for `path` and record that a lookup
    /// reference for it is being handed to the kernel.
    fn ino_for_lookup(&self, path: &str) -> u64 {
        let mut inodes = self.inodes.lock().unwrap();
        let ino = inodes.ino_for(path);
        inodes.note_lookup(ino);
        ino
    }

    /// Child path under the directory inode `parent`.
    fn child_path(&self, parent: u64, name: &OsStr) -> Option<String> {
        let dir = self.path_of(parent)?;
        Some(paths::join(&dir, &name.to_string_lossy()))
    }

    /// Attributes for `path`, listing the parent once on a cache miss so a
    /// lookup works without a prior readdir on the directory.
    async fn attr_with_refresh(&self, path: &str) -> Result<NodeAttr, FsError> {
        match self.fs.getattr(path) {
            Ok(attr) => Ok(attr),
            Err(FsError::NotFound(_)) => {
                let (parent, _) = paths::split_dir_file(path);
                let _ = self.fs.readdir(&parent).await?;
                self.fs.getattr(path)
            }
            Err(e) => Err(e),
        }
    }
}

fn errno(e: FsError) -> rfuse3::Errno {
    e.errno().into()
}

fn kind_to_fuse(kind: NodeKind) -> FuseFileType {
    match kind {
        NodeKind::Directory => FuseFileType::Directory,
        NodeKind::File => FuseFileType::RegularFile,
    }
}

fn to_fuse_attr(ino: u64, attr: &NodeAttr, req: &Request) -> rfuse3::raw::reply::FileAttr {
    // the store keeps no per-object ownership or mode; report the caller's
    // uid/gid with conventional permissions and current timestamps
    let now = Timestamp::from(SystemTime::now());
    let perm = match attr.kind {
        NodeKind::Directory => 0o755,
        NodeKind::File => 0o644,
    } as u16;
    rfuse3::raw::reply::FileAttr {
        ino,
        size: attr.size,
        blocks: attr.size.div_ceil(512),
        atime: now,
        mtime: now,
        ctime: now,
        #[cfg(target_os = "macos")]
        crtime: now,
        kind: kind_to_fuse(attr.kind),
        perm,
        nlink: 1,
        uid: req.uid,
        gid: req.gid,
        rdev: 0,
        #[cfg(target_os = "macos")]
        flags: 0,
        blksize: 4096,
    }
}

impl<B> Filesystem for FuseFs<B>
where
    B: ObjectBackend + 'static,
{
    type DirEntryStream<'a>
        = Pin<Box<dyn Stream<Item = FuseResult<DirectoryEntry>> + Send + 'a>>
    where
        Self: 'a;

    type DirEntryPlusStream<'a>
        = Pin<Box<dyn Stream<Item = FuseResult<DirectoryEntryPlus>> + Send + 'a>>
    where
        Self: 'a;

    async fn init(&self, _req: Request) -> FuseResult<ReplyInit> {
        // conservative cap; each buffered write is a memcpy into the buffer
        let max_write = NonZeroU32::new(1024 * 1024).unwrap();
        Ok(ReplyInit { max_write })
    }

    async fn destroy(&self, _req: Request) {}

    async fn lookup(&self, req: Request, parent: u64, name: &OsStr) -> FuseResult<ReplyEntry> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.attr_with_refresh(&path).await.map_err(errno)?;
        let ino = self.ino_for_lookup(&path);
        Ok(ReplyEntry {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
            generation: 0,
        })
    }

    async fn getattr(
        &self,
        req: Request,
        ino: u64,
        _fh: Option<u64>,
        _flags: u32,
    ) -> FuseResult<ReplyAttr> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.fs.getattr(&path).map_err(errno)?;
        Ok(ReplyAttr {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
        })
    }

    async fn setattr(
        &self,
        req: Request,
        ino: u64,
        _fh: Option<u64>,
        set_attr: SetAttr,
    ) -> FuseResult<ReplyAttr> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        // only truncation to zero is meaningful for buffered single-PUT
        // files; mode/ownership/times have no store representation
        match set_attr.size {
            Some(0) => self.fs.truncate(&path).map_err(errno)?,
            Some(_) => return Err(libc::EOPNOTSUPP.into()),
            None => {}
        }
        let attr = self.fs.getattr(&path).map_err(errno)?;
        Ok(ReplyAttr {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
        })
    }

    async fn mkdir(
        &self,
        req: Request,
        parent: u64,
        name: &OsStr,
        _mode: u32,
        _umask: u32,
    ) -> FuseResult<ReplyEntry> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        self.fs.mkdir(&path).await.map_err(errno)?;
        let attr = self.fs.getattr(&path).map_err(errno)?;
        let ino = self.ino_for_lookup(&path);
        Ok(ReplyEntry {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
            generation: 0,
        })
    }

    async fn mknod(
        &self,
        req: Request,
        parent: u64,
        name: &OsStr,
        _mode: u32,
        _rdev: u32,
    ) -> FuseResult<ReplyEntry> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        self.fs.mknod(&path).map_err(errno)?;
        let attr = self.fs.getattr(&path).map_err(errno)?;
        let ino = self.ino_for_lookup(&path);
        Ok(ReplyEntry {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
            generation: 0,
        })
    }

    async fn create(
        &self,
        req: Request,
        parent: u64,
        name: &OsStr,
        _mode: u32,
        _flags: u32,
    ) -> FuseResult<ReplyCreated> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        self.fs.mknod(&path).map_err(errno)?;
        let attr = self.fs.getattr(&path).map_err(errno)?;
        let ino = self.ino_for_lookup(&path);
        Ok(ReplyCreated {
            ttl: TTL,
            attr: to_fuse_attr(ino, &attr, &req),
            generation: 0,
            fh: 0,
            flags: 0,
        })
    }

    async fn open(&self, _req: Request, ino: u64, flags: u32) -> FuseResult<ReplyOpen> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.fs.getattr(&path).map_err(errno)?;
        if attr.kind == NodeKind::Directory {
            return Err(libc::EISDIR.into());
        }
        // a write-mode open stages a buffer seeded with the current content,
        // discarded up front only when the caller asked for O_TRUNC; the
        // flush on release replaces the whole object
        if flags as i32 & libc::O_ACCMODE != libc::O_RDONLY {
            let truncate = flags as i32 & libc::O_TRUNC != 0;
            self.fs.open_for_write(&path, truncate).await.map_err(errno)?;
        }
        Ok(ReplyOpen { fh: 0, flags: 0 })
    }

    async fn read(
        &self,
        _req: Request,
        ino: u64,
        _fh: u64,
        offset: u64,
        size: u32,
    ) -> FuseResult<ReplyData> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let data = self.fs.read(&path, offset, size as usize).await.map_err(errno)?;
        Ok(ReplyData {
            data: Bytes::from(data),
        })
    }

    async fn write(
        &self,
        _req: Request,
        ino: u64,
        _fh: u64,
        offset: u64,
        data: &[u8],
        _write_flags: u32,
        _flags: u32,
    ) -> FuseResult<ReplyWrite> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let n = self
            .fs
            .write(&path, data, offset as i64)
            .await
            .map_err(errno)?;
        Ok(ReplyWrite { written: n as u32 })
    }

    async fn release(
        &self,
        _req: Request,
        ino: u64,
        _fh: u64,
        _flags: u32,
        _lock_owner: u64,
        _flush: bool,
    ) -> FuseResult<()> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        self.fs.release(&path).await.map_err(errno)
    }

    async fn flush(&self, _req: Request, _ino: u64, _fh: u64, _lock_owner: u64) -> FuseResult<()> {
        Ok(())
    }

    async fn fsync(&self, _req: Request, _ino: u64, _fh: u64, _datasync: bool) -> FuseResult<()> {
        Ok(())
    }

    async fn opendir(&self, _req: Request, ino: u64, _flags: u32) -> FuseResult<ReplyOpen> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.fs.getattr(&path).map_err(errno)?;
        if attr.kind != NodeKind::Directory {
            return Err(libc::ENOTDIR.into());
        }
        Ok(ReplyOpen { fh: 0, flags: 0 })
    }

    async fn readdir<'a>(
        &'a self,
        _req: Request,
        ino: u64,
        _fh: u64,
        offset: i64,
    ) -> FuseResult<ReplyDirectory<Self::DirEntryStream<'a>>> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        if self.fs.getattr(&path).map_err(errno)?.kind != NodeKind::Directory {
            return Err(libc::ENOTDIR.into());
        }
        let entries = self.fs.readdir(&path).await.map_err(errno)?;

        let (parent_path, _) = paths::split_dir_file(&path);
        let parent_ino = if path == "/" {
            ROOT_INO
        } else {
            self.ino_for(&parent_path)
        };

        let mut all: Vec<DirectoryEntry> = Vec::with_capacity(entries.len() + 2);
        all.push(DirectoryEntry {
            inode: ino,
            kind: FuseFileType::Directory,
            name: OsString::from("."),
            offset: 1,
        });
        all.push(DirectoryEntry {
            inode: parent_ino,
            kind: FuseFileType::Directory,
            name: OsString::from(".."),
            offset: 2,
        });
        for (i, e) in entries.iter().enumerate() {
            let child = paths::join(&path, &e.name);
            all.push(DirectoryEntry {
                inode: self.ino_for(&child),
                kind: kind_to_fuse(e.kind),
                name: OsString::from(e.name.clone()),
                offset: (i as i64) + 3,
            });
        }

        // offset is the offset of the last entry already delivered
        let start = if offset <= 0 { 0 } else { offset as usize };
        let slice = if start >= all.len() {
            Vec::new()
        } else {
            all[start..].to_vec()
        };
        let boxed: Self::DirEntryStream<'a> = Box::pin(stream::iter(slice.into_iter().map(Ok)));
        Ok(ReplyDirectory { entries: boxed })
    }

    async fn readdirplus<'a>(
        &'a self,
        req: Request,
        ino: u64,
        _fh: u64,
        offset: u64,
        _lock_owner: u64,
    ) -> FuseResult<ReplyDirectoryPlus<Self::DirEntryPlusStream<'a>>> {
        let Some(path) = self.path_of(ino) else {
            return Err(libc::ENOENT.into());
        };
        let self_attr = self.fs.getattr(&path).map_err(errno)?;
        if self_attr.kind != NodeKind::Directory {
            return Err(libc::ENOTDIR.into());
        }
        let entries = self.fs.readdir(&path).await.map_err(errno)?;

        let (parent_path, _) = paths::split_dir_file(&path);
        let parent_ino = if path == "/" {
            ROOT_INO
        } else {
            self.ino_for(&parent_path)
        };
        let parent_attr = NodeAttr {
            kind: NodeKind::Directory,
            size: 0,
        };

        let mut all: Vec<DirectoryEntryPlus> = Vec::with_capacity(entries.len() + 2);
        all.push(DirectoryEntryPlus {
            inode: ino,
            generation: 0,
            kind: FuseFileType::Directory,
            name: OsString::from("."),
            offset: 1,
            attr: to_fuse_attr(ino, &self_attr, &req),
            entry_ttl: TTL,
            attr_ttl: TTL,
        });
        all.push(DirectoryEntryPlus {
            inode: parent_ino,
            generation: 0,
            kind: FuseFileType::Directory,
            name: OsString::from(".."),
            offset: 2,
            attr: to_fuse_attr(parent_ino, &parent_attr, &req),
            entry_ttl: TTL,
            attr_ttl: TTL,
        });
        for (i, e) in entries.iter().enumerate() {
            let child = paths::join(&path, &e.name);
            let Ok(cattr) = self.fs.getattr(&child) else {
                continue;
            };
            let child_ino = self.ino_for_lookup(&child);
            all.push(DirectoryEntryPlus {
                inode: child_ino,
                generation: 0,
                kind: kind_to_fuse(e.kind),
                name: OsString::from(e.name.clone()),
                offset: (i as i64) + 3,
                attr: to_fuse_attr(child_ino, &cattr, &req),
                entry_ttl: TTL,
                attr_ttl: TTL,
            });
        }

        let start = if offset == 0 { 0 } else { offset as usize };
        let slice = if start >= all.len() {
            Vec::new()
        } else {
            all[start..].to_vec()
        };
        let boxed: Self::DirEntryPlusStream<'a> = Box::pin(stream::iter(slice.into_iter().map(Ok)));
        Ok(ReplyDirectoryPlus { entries: boxed })
    }

    async fn releasedir(&self, _req: Request, _ino: u64, _fh: u64, _flags: u32) -> FuseResult<()> {
        Ok(())
    }

    async fn fsyncdir(&self, _req: Request, _ino: u64, _fh: u64, _datasync: bool) -> FuseResult<()> {
        Ok(())
    }

    async fn unlink(&self, _req: Request, parent: u64, name: &OsStr) -> FuseResult<()> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.fs.getattr(&path).map_err(errno)?;
        if attr.kind == NodeKind::Directory {
            return Err(libc::EISDIR.into());
        }
        self.fs.unlink(&path).await.map_err(errno)?;
        self.inodes.lock().unwrap().remove(&path);
        Ok(())
    }

    async fn rmdir(&self, _req: Request, parent: u64, name: &OsStr) -> FuseResult<()> {
        let Some(path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        let attr = self.fs.getattr(&path).map_err(errno)?;
        if attr.kind != NodeKind::Directory {
            return Err(libc::ENOTDIR.into());
        }
        self.fs.rmdir(&path).await.map_err(errno)?;
        self.inodes.lock().unwrap().remove(&path);
        Ok(())
    }

    async fn rename(
        &self,
        _req: Request,
        parent: u64,
        name: &OsStr,
        new_parent: u64,
        new_name: &OsStr,
    ) -> FuseResult<()> {
        let Some(old_path) = self.child_path(parent, name) else {
            return Err(libc::ENOENT.into());
        };
        let Some(new_path) = self.child_path(new_parent, new_name) else {
            return Err(libc::ENOENT.into());
        };
        self.fs.rename(&old_path, &new_path).await.map_err(errno)?;
        self.inodes.lock().unwrap().rename(&old_path, &new_path);
        Ok(())
    }

    async fn statfs(&self, _req: Request, _ino: u64) -> FuseResult<ReplyStatFs> {
        let st = self.fs.statfs();
        Ok(ReplyStatFs {
            blocks: st.blocks,
            bfree: st.blocks_free,
            bavail: st.blocks_available,
            files: st.files,
            ffree: st.files_free,
            bsize: st.block_size,
            namelen: st.name_max,
            frsize: st.fragment_size,
        })
    }

    async fn forget(&self, _req: Request, ino: u64, nlookup: u64) {
        self.inodes.lock().unwrap().forget(ino, nlookup);
    }

    async fn batch_forget(&self, _req: Request, inodes: &[(u64, u64)]) {
        let mut table = self.inodes.lock().unwrap();
        for &(ino, nlookup) in inodes {
            table.forget(ino, nlookup);
        }
    }

    async fn interrupt(&self, _req: Request, _unique: u64) -> FuseResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod ino_table_tests {
    use super::{InoTable, ROOT_INO};

    #[test]
    fn forget_evicts_when_lookups_reach_zero() {
        let mut t = InoTable::new();
        let ino = t.ino_for("/a");
        t.note_lookup(ino);
        t.note_lookup(ino);

        t.forget(ino, 1);
        assert_eq!(t.path_of(ino).as_deref(), Some("/a"));
        t.forget(ino, 1);
        assert!(t.path_of(ino).is_none());

        // a later lookup allocates a fresh inode for the same path
        assert_ne!(t.ino_for("/a"), ino);
    }

    #[test]
    fn forget_saturates_and_ignores_unknown_inodes() {
        let mut t = InoTable::new();
        let ino = t.ino_for("/b");
        t.note_lookup(ino);
        t.forget(ino, 100);
        assert!(t.path_of(ino).is_none());

        // never handed to the kernel, so there is nothing to drop
        let quiet = t.ino_for("/c");
        t.forget(quiet, 1);
        assert_eq!(t.path_of(quiet).as_deref(), Some("/c"));
    }

    #[test]
    fn root_is_never_evicted() {
        let mut t = InoTable::new();
        t.forget(ROOT_INO, u64::MAX);
        assert_eq!(t.path_of(ROOT_INO).as_deref(), Some("/"));
    }
}

#[cfg(all(test, target_os = "linux"))]
mod mount_tests {
    use crate::fuse::FuseFs;
    use crate::fuse::mount::mount_unprivileged;
    use crate::store::client::ObjectClient;
    use crate::store::localfs::LocalFsBackend;
    use crate::vfs::fs::ObjectFs;
    use std::fs;
    use std::io::Write;
    use std::time::Duration;

    // Real-mount smoke test; needs fusermount3, so it is opt-in via
    // OBJECTFS_FUSE_TEST=1.
    #[tokio::test(flavor = "multi_thread")]
    async fn smoke_mount_and_basic_ops() {
        if std::env::var("OBJECTFS_FUSE_TEST").ok().as_deref() != Some("1") {
            eprintln!("skip fuse mount test: set OBJECTFS_FUSE_TEST=1 to enable");
            return;
        }

        let data = tempfile::tempdir().expect("tmp data");
        let client = ObjectClient::new(LocalFsBackend::new(data.path()));
        let fs = FuseFs::new(ObjectFs::new(client));

        let mnt = tempfile::tempdir().expect("tmp mount");
        let mnt_path = mnt.path().to_path_buf();
        let handle = match mount_unprivileged(fs, &mnt_path, "objectfs-test").await {
            Ok(h) => h,
            Err(e) => {
                eprintln!("skip fuse test: mount failed: {e}");
                return;
            }
        };
        tokio::time::sleep(Duration::from_millis(2000)).await;

        let dir = mnt_path.join("a");
        fs::create_dir(&dir).expect("mkdir");
        let file_path = dir.join("hello.txt");
        {
            let mut f = fs::File::create(&file_path).expect("create");
            f.write_all(b"abc").expect("write");
            f.flush().expect("flush");
        }
        // release is async with respect to close; give the flush a moment
        tokio::time::sleep(Duration::from_millis(200)).await;
        let content = fs::read(&file_path).expect("read back");
        assert_eq!(content, b"abc");

        let names: Vec<_> = fs::read_dir(&dir)
            .expect("readdir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert!(names.iter().any(|n| n.to_string_lossy() == "hello.txt"));

        fs::remove_file(&file_path).expect("unlink");
        if let Err(e) = handle.unmount().await {
            eprintln!("unmount error: {e}");
        }
    }
}
