//! The file registry: a user's view of their folder in the object store.
//!
//! The registry owns an in-memory copy of the listing and exposes the
//! mutating operations (delete, rename, download). Consistency model:
//! after every successful mutation the listing is re-fetched wholesale from
//! the store. No local diffing, no optimistic updates — an extra round trip
//! per mutation buys freedom from local/remote divergence after partial
//! failures.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::RegistryError;
use crate::key::object_key;
use crate::store::{FileEntry, ListOptions, ObjectStore};
use crate::user::UserIdentity;

/// An in-progress rename: which entry is being renamed and the draft of
/// its new name. At most one rename is pending at a time; starting another
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDraft {
    pub target: String,
    pub new_name: String,
}

/// Extended details of the entry the user selected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub name: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

pub struct FileRegistry {
    store: Arc<dyn ObjectStore>,
    user: UserIdentity,
    entries: Vec<FileEntry>,
    loading: bool,
    last_error: Option<String>,
    rename: Option<RenameDraft>,
    selected: Option<FileDetails>,
    refresh_trigger: u64,
}

impl FileRegistry {
    /// Creates an empty registry for one user's folder. Call
    /// [`FileRegistry::refresh`] to populate it.
    pub fn new(store: Arc<dyn ObjectStore>, user: UserIdentity) -> Self {
        Self {
            store,
            user,
            entries: Vec::new(),
            loading: false,
            last_error: None,
            rename: None,
            selected: None,
            refresh_trigger: 0,
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// The current listing, in the order the store returned it
    /// (creation time descending). Possibly stale after a failed refresh.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The message from the most recent failed refresh, cleared by the
    /// next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn rename_draft(&self) -> Option<&RenameDraft> {
        self.rename.as_ref()
    }

    pub fn selected(&self) -> Option<&FileDetails> {
        self.selected.as_ref()
    }

    pub fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    /// Re-fetches the listing from the store and replaces `entries`
    /// wholesale.
    ///
    /// On failure the previous entries stay available (stale beats blank)
    /// and the error message is recorded. The loading flag is cleared on
    /// both paths. Safe to call repeatedly.
    pub async fn refresh(&mut self) -> Result<(), RegistryError> {
        self.loading = true;
        let result = self.store.list(self.user.id(), &ListOptions::default()).await;
        self.loading = false;

        match result {
            Ok(entries) => {
                self.entries = entries;
                self.last_error = None;
                Ok(())
            }
            Err(source) => {
                let err = RegistryError::List(source);
                self.last_error = Some(err.to_string());
                tracing::error!(user = %self.user, error = %err, "failed to refresh file list");
                Err(err)
            }
        }
    }

    /// Fetches the raw bytes of one of the user's files. Registry state is
    /// not touched; delivering the bytes (e.g. as a browser download) is
    /// the caller's business.
    pub async fn download(&self, name: &str) -> Result<Vec<u8>, RegistryError> {
        let key = object_key(&self.user, name);
        self.store.download(&key).await.map_err(|source| {
            let err = RegistryError::Download {
                name: name.to_string(),
                source,
            };
            tracing::error!(user = %self.user, error = %err, "download failed");
            err
        })
    }

    /// Removes one of the user's files, then re-fetches the listing so
    /// `entries` reflects the authoritative post-delete state.
    ///
    /// On removal failure nothing was changed locally, so the entry simply
    /// stays visible.
    pub async fn delete(&mut self, name: &str) -> Result<(), RegistryError> {
        let key = object_key(&self.user, name);
        if let Err(source) = self.store.remove(std::slice::from_ref(&key)).await {
            let err = RegistryError::Delete {
                name: name.to_string(),
                source,
            };
            tracing::error!(user = %self.user, error = %err, "delete failed");
            return Err(err);
        }
        self.refresh().await
    }

    /// Marks `name` as the rename target with the current name as draft.
    /// Replaces any previous draft, keeping at most one rename pending.
    pub fn begin_rename(&mut self, name: &str) {
        self.rename = Some(RenameDraft {
            target: name.to_string(),
            new_name: name.to_string(),
        });
    }

    pub fn set_rename_draft(&mut self, new_name: impl Into<String>) {
        if let Some(draft) = self.rename.as_mut() {
            draft.new_name = new_name.into();
        }
    }

    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    /// Completes the pending rename.
    ///
    /// The store has no atomic rename, so this is copy-then-remove: the old
    /// object is only removed once the copy has succeeded. A remove failure
    /// after a successful copy leaves both objects in the store; that state
    /// is reported as [`RegistryError::RemoveAfterCopy`], not repaired.
    ///
    /// An empty (trimmed) draft fails validation before any remote call.
    /// Whatever the outcome, the pending rename is cleared.
    pub async fn commit_rename(&mut self) -> Result<(), RegistryError> {
        let Some(draft) = self.rename.take() else {
            return Err(RegistryError::Validation(
                "no rename in progress".to_string(),
            ));
        };

        let new_name = draft.new_name.trim();
        if new_name.is_empty() {
            return Err(RegistryError::Validation(
                "new file name must not be empty".to_string(),
            ));
        }

        let from = object_key(&self.user, &draft.target);
        let to = object_key(&self.user, new_name);

        if let Err(source) = self.store.copy(&from, &to).await {
            let err = RegistryError::Copy { from, to, source };
            tracing::error!(user = %self.user, error = %err, "rename copy failed");
            return Err(err);
        }

        if let Err(source) = self.store.remove(std::slice::from_ref(&from)).await {
            let err = RegistryError::RemoveAfterCopy { from, to, source };
            tracing::error!(
                user = %self.user,
                error = %err,
                "rename left both objects in place"
            );
            return Err(err);
        }

        self.refresh().await
    }

    /// `begin_rename` + `set_rename_draft` + `commit_rename` in one call.
    pub async fn rename(&mut self, name: &str, new_name: &str) -> Result<(), RegistryError> {
        self.begin_rename(name);
        self.set_rename_draft(new_name);
        self.commit_rename().await
    }

    /// Records `name`'s details for display. Purely local; returns `None`
    /// when the name is not in the current listing.
    pub fn select_for_details(&mut self, name: &str) -> Option<&FileDetails> {
        let entry = self.entries.iter().find(|e| e.name == name)?;
        self.selected = Some(FileDetails {
            name: entry.name.clone(),
            size: entry.size,
            created_at: entry.created_at,
            last_modified: entry.last_modified(),
        });
        self.selected.as_ref()
    }

    /// Signal from the upload side that a new object landed in the user's
    /// folder. Bumps the monotonic trigger and refreshes.
    pub async fn notify_upload(&mut self) -> Result<(), RegistryError> {
        self.refresh_trigger += 1;
        self.refresh().await
    }
}
