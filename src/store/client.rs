//! Object-store client seam.
//!
//! Everything above this module talks to the store through [`ObjectBackend`]:
//! whole-object put/get/delete plus one-level prefix listing. Backend choice
//! (S3, local directory, in-memory test double) is a pluggable implementation
//! of this trait rather than a per-backend adapter copy.

use crate::error::BackendError;
use async_trait::async_trait;
use std::time::SystemTime;

/// Metadata for one object returned by a listing.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

/// One page of a prefix/delimiter listing: grouped prefixes (one directory
/// level) and the objects directly under the prefix.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub common_prefixes: Vec<String>,
    pub objects: Vec<ObjectMeta>,
}

/// Abstract object-store backend.
///
/// `get_object` returns `Ok(None)` for an absent key; transport/auth failures
/// are boxed errors. Keys never carry a leading separator (see `vfs::paths`).
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<(), BackendError>;

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Byte-range variant. The default fetches the whole object and slices;
    /// backends with native range reads (S3) override it.
    async fn get_object_range(
        &self,
        key: &str,
        offset: u64,
        len: usize,
    ) -> Result<Option<Vec<u8>>, BackendError> {
        match self.get_object(key).await? {
            None => Ok(None),
            Some(body) => {
                let start = (offset as usize).min(body.len());
                let end = (start + len).min(body.len());
                Ok(Some(body[start..end].to_vec()))
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError>;

    /// Single-level listing of `prefix` grouped by `delimiter`.
    async fn list_objects(&self, prefix: &str, delimiter: &str) -> Result<Listing, BackendError>;
}

/// Thin client wrapper over a backend, the handle the adapter holds.
pub struct ObjectClient<B: ObjectBackend> {
    backend: B,
}

impl<B: ObjectBackend> ObjectClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn put_object(&self, key: &str, data: &[u8]) -> Result<(), BackendError> {
        self.backend.put_object(key, data).await
    }

    pub async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        self.backend.get_object(key).await
    }

    pub async fn get_object_range(
        &self,
        key: &str,
        offset: u64,
        len: usize,
    ) -> Result<Option<Vec<u8>>, BackendError> {
        self.backend.get_object_range(key, offset, len).await
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        self.backend.delete_object(key).await
    }

    pub async fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Listing, BackendError> {
        self.backend.list_objects(prefix, delimiter).await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryBackend;

    #[tokio::test]
    async fn default_range_fetch_slices_and_clamps() {
        let client = ObjectClient::new(InMemoryBackend::new());
        client.put_object("k", b"0123456789").await.unwrap();

        let mid = client.get_object_range("k", 2, 4).await.unwrap().unwrap();
        assert_eq!(mid, b"2345");
        // ranges past the end clamp instead of failing
        let tail = client.get_object_range("k", 8, 10).await.unwrap().unwrap();
        assert_eq!(tail, b"89");
        let past = client.get_object_range("k", 50, 4).await.unwrap().unwrap();
        assert!(past.is_empty());
        assert!(client.get_object_range("gone", 0, 4).await.unwrap().is_none());
    }
}
