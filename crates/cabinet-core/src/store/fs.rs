//! Filesystem-backed object store.
//!
//! Maps object keys onto paths under a root directory: key `u1/report.pdf`
//! lives at `<root>/u1/report.pdf`. Because keys come from request data,
//! every key is validated component-by-component before it touches the
//! filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::store::{
    paginate, sort_entries, FileEntry, ListOptions, ObjectStore, UploadOptions,
};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to a path under the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".to_string()));
        }
        let mut path = self.root.clone();
        for component in key.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            if component.contains('\\') {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            path.push(component);
        }
        Ok(path)
    }

    fn entry_from_metadata(name: String, metadata: &std::fs::Metadata) -> FileEntry {
        // Birth time is not available on every filesystem; fall back to
        // mtime so ordering stays stable rather than erroring out.
        let created: DateTime<Utc> = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());
        let updated = metadata.modified().ok().map(DateTime::from);
        FileEntry {
            name,
            size: metadata.len(),
            created_at: created,
            updated_at: updated,
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StoreResult<Vec<FileEntry>> {
        let dir = self.resolve(prefix)?;

        // A user who has never uploaded has no folder yet; that is an
        // empty listing, not an error.
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut entries = Vec::new();
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let metadata = match dir_entry.metadata().await {
                Ok(m) => m,
                Err(_) => continue,
            };
            if !metadata.is_file() {
                continue;
            }
            let name = dir_entry.file_name().to_string_lossy().to_string();
            entries.push(Self::entry_from_metadata(name, &metadata));
        }

        sort_entries(&mut entries, options.sort);
        Ok(paginate(entries, options))
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>, options: &UploadOptions) -> StoreResult<()> {
        let path = self.resolve(key)?;

        if !options.upsert && tokio::fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn download(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn remove(&self, keys: &[String]) -> StoreResult<()> {
        for key in keys {
            let path = self.resolve(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StoreError::NotFound(key.clone()));
                }
                Err(e) => return Err(StoreError::Io(e)),
            }
        }
        Ok(())
    }

    async fn copy(&self, src: &str, dst: &str) -> StoreResult<()> {
        let src_path = self.resolve(src)?;
        let dst_path = self.resolve(dst)?;

        if !tokio::fs::try_exists(&src_path).await? {
            return Err(StoreError::NotFound(src.to_string()));
        }
        if let Some(parent) = dst_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&src_path, &dst_path).await?;
        Ok(())
    }
}
