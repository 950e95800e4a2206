//! In-memory backend: the unit-test double.
//!
//! Implements real prefix/delimiter grouping over a `BTreeMap` so directory
//! emulation can be exercised without a store, counts every call so tests can
//! assert exact call patterns (e.g. one PUT per flush), and can be told to
//! fail puts or listings to drive the error paths.

use crate::error::BackendError;
use crate::store::client::{Listing, ObjectBackend, ObjectMeta};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::SystemTime;

struct StoredObject {
    data: Vec<u8>,
    last_modified: SystemTime,
}

#[derive(Default)]
pub struct InMemoryBackend {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    pub put_count: AtomicUsize,
    pub get_count: AtomicUsize,
    pub delete_count: AtomicUsize,
    pub list_count: AtomicUsize,
    pub fail_puts: AtomicBool,
    pub fail_lists: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of one stored object, for assertions.
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.data.clone())
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn puts(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectBackend for InMemoryBackend {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<(), BackendError> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(Box::new(std::io::Error::other("injected put failure")));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                last_modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.data.clone()))
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str, delimiter: &str) -> Result<Listing, BackendError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(Box::new(std::io::Error::other("injected list failure")));
        }
        let objects = self.objects.lock().unwrap();
        let mut listing = Listing::default();
        let mut seen_prefixes = BTreeSet::new();
        for (key, obj) in objects.range(prefix.to_string()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break; // past the prefix range
            };
            match rest.find(delimiter) {
                // anything one level (or deeper) below the prefix groups into
                // a common prefix ending at the first delimiter
                Some(idx) => {
                    let grouped = format!("{prefix}{}{delimiter}", &rest[..idx]);
                    if seen_prefixes.insert(grouped.clone()) {
                        listing.common_prefixes.push(grouped);
                    }
                }
                None => {
                    listing.objects.push(ObjectMeta {
                        key: key.clone(),
                        size: obj.data.len() as u64,
                        last_modified: Some(obj.last_modified),
                    });
                }
            }
        }
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grouping_one_level() {
        let backend = InMemoryBackend::new();
        backend.put_object("a/", b"").await.unwrap();
        backend.put_object("a/x.txt", b"1").await.unwrap();
        backend.put_object("a/b/", b"").await.unwrap();
        backend.put_object("a/b/deep.txt", b"22").await.unwrap();
        backend.put_object("top.txt", b"333").await.unwrap();

        let root = backend.list_objects("", "/").await.unwrap();
        assert_eq!(root.common_prefixes, vec!["a/".to_string()]);
        assert_eq!(root.objects.len(), 1);
        assert_eq!(root.objects[0].key, "top.txt");

        let under_a = backend.list_objects("a/", "/").await.unwrap();
        assert_eq!(under_a.common_prefixes, vec!["a/b/".to_string()]);
        // the marker "a/" itself plus "a/x.txt"
        let keys: Vec<_> = under_a.objects.iter().map(|o| o.key.as_str()).collect();
        assert!(keys.contains(&"a/"));
        assert!(keys.contains(&"a/x.txt"));
    }

    #[tokio::test]
    async fn counts_and_failures() {
        let backend = InMemoryBackend::new();
        backend.put_object("k", b"v").await.unwrap();
        assert_eq!(backend.puts(), 1);

        backend.set_fail_puts(true);
        assert!(backend.put_object("k", b"v").await.is_err());
        assert_eq!(backend.puts(), 2);
        backend.set_fail_puts(false);

        // failed put must not have replaced the stored value
        assert_eq!(backend.object("k").unwrap(), b"v");
    }
}
