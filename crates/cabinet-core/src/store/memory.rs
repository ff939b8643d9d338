//! In-memory object store for tests and single-process dev setups.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    paginate, sort_entries, FileEntry, ListOptions, ObjectStore, UploadOptions,
};

#[derive(Debug, Clone)]
struct Blob {
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Blob>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object with explicit timestamps. Intended for tests that
    /// need a deterministic creation order.
    pub async fn put_with_times(
        &self,
        key: &str,
        bytes: Vec<u8>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) {
        self.objects.lock().await.insert(
            key.to_string(),
            Blob {
                bytes,
                created_at,
                updated_at,
            },
        );
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StoreResult<Vec<FileEntry>> {
        let folder = format!("{prefix}/");
        let objects = self.objects.lock().await;

        let mut entries: Vec<FileEntry> = objects
            .iter()
            .filter_map(|(key, blob)| {
                let name = key.strip_prefix(&folder)?;
                // Only direct children of the prefix.
                if name.is_empty() || name.contains('/') {
                    return None;
                }
                Some(FileEntry {
                    name: name.to_string(),
                    size: blob.bytes.len() as u64,
                    created_at: blob.created_at,
                    updated_at: blob.updated_at,
                })
            })
            .collect();

        sort_entries(&mut entries, options.sort);
        Ok(paginate(entries, options))
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>, options: &UploadOptions) -> StoreResult<()> {
        let mut objects = self.objects.lock().await;
        if let Some(existing) = objects.get_mut(key) {
            if !options.upsert {
                return Err(StoreError::AlreadyExists(key.to_string()));
            }
            existing.bytes = bytes;
            existing.updated_at = Some(Utc::now());
            return Ok(());
        }
        objects.insert(
            key.to_string(),
            Blob {
                bytes,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(())
    }

    async fn download(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.objects
            .lock()
            .await
            .get(key)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn remove(&self, keys: &[String]) -> StoreResult<()> {
        let mut objects = self.objects.lock().await;
        for key in keys {
            if objects.remove(key).is_none() {
                return Err(StoreError::NotFound(key.clone()));
            }
        }
        Ok(())
    }

    async fn copy(&self, src: &str, dst: &str) -> StoreResult<()> {
        let mut objects = self.objects.lock().await;
        let blob = objects
            .get(src)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(src.to_string()))?;
        objects.insert(
            dst.to_string(),
            Blob {
                bytes: blob.bytes,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn list_scopes_to_prefix_and_direct_children() {
        let store = MemoryStore::new();
        let t = Utc.timestamp_opt(100, 0).unwrap();
        store.put_with_times("u1/a.txt", b"a".to_vec(), t, None).await;
        store.put_with_times("u1/sub/b.txt", b"b".to_vec(), t, None).await;
        store.put_with_times("u2/c.txt", b"c".to_vec(), t, None).await;
        // "u10" must not match prefix "u1".
        store.put_with_times("u10/d.txt", b"d".to_vec(), t, None).await;

        let entries = store.list("u1", &ListOptions::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
    }

    #[tokio::test]
    async fn list_orders_newest_first_by_default() {
        let store = MemoryStore::new();
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        store.put_with_times("u1/old.txt", b"1".to_vec(), t(100), None).await;
        store.put_with_times("u1/new.txt", b"2".to_vec(), t(300), None).await;
        store.put_with_times("u1/mid.txt", b"3".to_vec(), t(200), None).await;

        let entries = store.list("u1", &ListOptions::default()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["new.txt", "mid.txt", "old.txt"]);
    }

    #[tokio::test]
    async fn upsert_false_preserves_existing_object() {
        let store = MemoryStore::new();
        let opts = UploadOptions::default();
        store.upload("u1/a.txt", b"one".to_vec(), &opts).await.unwrap();

        let result = store.upload("u1/a.txt", b"two".to_vec(), &opts).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(store.download("u1/a.txt").await.unwrap(), b"one");
    }

    #[tokio::test]
    async fn remove_missing_key_fails() {
        let store = MemoryStore::new();
        let result = store.remove(&["u1/gone.txt".to_string()]).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn copy_duplicates_content() {
        let store = MemoryStore::new();
        store
            .upload("u1/a.txt", b"data".to_vec(), &UploadOptions::default())
            .await
            .unwrap();
        store.copy("u1/a.txt", "u1/b.txt").await.unwrap();

        assert!(store.contains("u1/a.txt").await);
        assert_eq!(store.download("u1/b.txt").await.unwrap(), b"data");
    }
}
