//! Local-directory backend: mocks the object store on a plain directory tree.
//!
//! Keys map to file paths under the root; a trailing-separator key (directory
//! marker) maps to a real directory. Used by tests and the `mount-local` demo.

use crate::error::BackendError;
use crate::store::client::{Listing, ObjectBackend, ObjectMeta};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

pub struct LocalFsBackend {
    root: PathBuf,
}

impl LocalFsBackend {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_end_matches('/'))
    }
}

#[async_trait]
impl ObjectBackend for LocalFsBackend {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<(), BackendError> {
        let path = self.path_for(key);
        if key.ends_with('/') {
            fs::create_dir_all(path).await?;
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let mut f = fs::File::create(path).await?;
        f.write_all(data).await?;
        f.flush().await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let path = self.path_for(key);
        if key.ends_with('/') {
            return match fs::metadata(&path).await {
                Ok(m) if m.is_dir() => Ok(Some(Vec::new())),
                Ok(_) => Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(Box::new(e)),
            };
        }
        match fs::read(path).await {
            Ok(buf) => Ok(Some(buf)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        let path = self.path_for(key);
        let res = if key.ends_with('/') {
            fs::remove_dir(path).await
        } else {
            fs::remove_file(path).await
        };
        match res {
            Ok(()) => Ok(()),
            // Deleting an absent key is a no-op, as on S3.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn list_objects(&self, prefix: &str, _delimiter: &str) -> Result<Listing, BackendError> {
        let dir = if prefix.is_empty() {
            self.root.clone()
        } else {
            self.root.join(prefix.trim_end_matches('/'))
        };
        let mut listing = Listing::default();
        let mut rd = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(listing),
            Err(e) => return Err(Box::new(e)),
        };
        while let Some(entry) = rd.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let meta = entry.metadata().await?;
            if meta.is_dir() {
                listing.common_prefixes.push(format!("{prefix}{name}/"));
            } else {
                listing.objects.push(ObjectMeta {
                    key: format!("{prefix}{name}"),
                    size: meta.len(),
                    last_modified: meta.modified().ok(),
                });
            }
        }
        Ok(listing)
    }
}
