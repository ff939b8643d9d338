//! Object store abstractions.
//!
//! [`ObjectStore`] is the capability set the registry consumes: list,
//! upload, download, remove, copy. Rename is deliberately absent — the
//! backends modelled here offer no atomic rename, so the registry performs
//! copy-then-remove itself.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;

/// A single stored file as reported by [`ObjectStore::list`].
///
/// The store is the authority for these values; the registry only ever
/// holds a read-only, possibly-stale copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, unique within a user's folder. Together with the user
    /// prefix it forms the object key.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// Last-modified time, falling back to the creation time for objects
    /// that have never been rewritten.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Column to sort a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Size,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

/// Options for [`ObjectStore::list`].
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
    pub sort: SortSpec,
}

impl Default for ListOptions {
    /// The registry's listing shape: up to 100 entries, offset 0, newest
    /// first.
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort: SortSpec {
                column: SortColumn::CreatedAt,
                order: SortOrder::Descending,
            },
        }
    }
}

/// Options for [`ObjectStore::upload`].
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Cache-control hint forwarded to backends that serve objects over
    /// HTTP. Filesystem backends ignore it.
    pub cache_control: Option<String>,
    /// Overwrite an existing object at the same key.
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: Some("3600".to_string()),
            upsert: false,
        }
    }
}

/// Capability set of an external object store.
///
/// Keys follow the `{userId}/{fileName}` convention from [`crate::key`].
/// All operations are fallible and none retries internally; callers decide
/// how to surface failures.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists objects under `prefix`, returning their names relative to the
    /// prefix. A prefix with no objects yields an empty vec, not an error.
    async fn list(&self, prefix: &str, options: &ListOptions) -> StoreResult<Vec<FileEntry>>;

    /// Stores `bytes` at `key`. Fails with `AlreadyExists` when the key is
    /// taken and `options.upsert` is false.
    async fn upload(&self, key: &str, bytes: Vec<u8>, options: &UploadOptions) -> StoreResult<()>;

    /// Fetches the raw bytes of the object at `key`.
    async fn download(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Removes every object in `keys`. Fails on the first missing key.
    async fn remove(&self, keys: &[String]) -> StoreResult<()>;

    /// Copies the object at `src` to `dst`, overwriting `dst` if present.
    async fn copy(&self, src: &str, dst: &str) -> StoreResult<()>;
}

/// Sorts entries in place according to `spec`. Shared by backends that hold
/// unordered objects.
pub(crate) fn sort_entries(entries: &mut [FileEntry], spec: SortSpec) {
    entries.sort_by(|a, b| {
        let ordering = match spec.column {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Size => a.size.cmp(&b.size),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            SortColumn::UpdatedAt => a.last_modified().cmp(&b.last_modified()),
        };
        match spec.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Applies `offset` and `limit` to a sorted listing.
pub(crate) fn paginate(entries: Vec<FileEntry>, options: &ListOptions) -> Vec<FileEntry> {
    entries
        .into_iter()
        .skip(options.offset)
        .take(options.limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, size: u64, created_secs: i64) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            size,
            created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn last_modified_falls_back_to_created() {
        let e = entry("a.txt", 1, 100);
        assert_eq!(e.last_modified(), e.created_at);

        let updated = Utc.timestamp_opt(200, 0).unwrap();
        let e = FileEntry {
            updated_at: Some(updated),
            ..e
        };
        assert_eq!(e.last_modified(), updated);
    }

    #[test]
    fn default_options_are_newest_first_100() {
        let opts = ListOptions::default();
        assert_eq!(opts.limit, 100);
        assert_eq!(opts.offset, 0);
        assert_eq!(opts.sort.column, SortColumn::CreatedAt);
        assert_eq!(opts.sort.order, SortOrder::Descending);
    }

    #[test]
    fn sort_created_descending() {
        let mut entries = vec![entry("old", 1, 100), entry("new", 1, 300), entry("mid", 1, 200)];
        sort_entries(
            &mut entries,
            SortSpec {
                column: SortColumn::CreatedAt,
                order: SortOrder::Descending,
            },
        );
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[test]
    fn paginate_applies_offset_then_limit() {
        let entries = vec![entry("a", 1, 1), entry("b", 1, 2), entry("c", 1, 3)];
        let opts = ListOptions {
            limit: 1,
            offset: 1,
            ..Default::default()
        };
        let page = paginate(entries, &opts);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "b");
    }
}
