//! Cabinet core library — UI-agnostic file locker logic.
//!
//! `cabinet-core` holds the logic for managing one user's folder in an
//! external object store. It is intentionally decoupled from any web
//! framework so the HTTP frontend (`cabinet-web`) stays thin glue.
//!
//! # Modules
//!
//! - [`registry`] — [`FileRegistry`]: the per-user view of the folder and
//!   its mutation operations (refresh, download, delete, rename, details).
//! - [`store`] — the [`ObjectStore`] capability trait plus filesystem and
//!   in-memory backends.
//! - [`key`] — the `{userId}/{fileName}` key convention and file-name
//!   validation.
//! - [`user`] — [`UserIdentity`], the explicit identity value threaded into
//!   every store-facing component.
//! - [`error`] — [`StoreError`], [`RegistryError`] and the [`StoreResult`]
//!   alias.

pub mod error;
pub mod key;
pub mod registry;
pub mod store;
pub mod user;

pub use error::{RegistryError, StoreError, StoreResult};
pub use key::{object_key, validate_file_name};
pub use registry::{FileDetails, FileRegistry, RenameDraft};
pub use store::fs::FsObjectStore;
pub use store::memory::MemoryStore;
pub use store::{FileEntry, ListOptions, ObjectStore, SortColumn, SortOrder, SortSpec, UploadOptions};
pub use user::UserIdentity;
