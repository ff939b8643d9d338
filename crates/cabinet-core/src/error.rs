//! Error types for `cabinet-core`.
//!
//! Store backends return [`StoreResult<T>`]; the file registry wraps store
//! failures into [`RegistryError`] so callers can tell which operation
//! failed and, for renames, which phase.

/// Failure reported by an [`crate::store::ObjectStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object exists at the given key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An object already exists at the key and `upsert` was not requested.
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    /// The key is malformed (empty component, `..`, backslash, etc.).
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// Backend-specific failure that doesn't fit a more specific variant.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// An I/O error from a filesystem-backed store.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used by store backends.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a file registry operation.
///
/// Each variant corresponds to one operation boundary; a failed operation
/// never mutates `entries`, so the registry view stays consistent with the
/// last successful listing.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A precondition failed before any remote call was issued.
    #[error("{0}")]
    Validation(String),

    /// Listing the user's folder failed during a refresh.
    #[error("failed to list files: {0}")]
    List(#[source] StoreError),

    /// Fetching object bytes failed.
    #[error("failed to download {name}: {source}")]
    Download {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Removing an object failed.
    #[error("failed to delete {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Rename phase 1 (copy to the new key) failed. Nothing was removed.
    #[error("failed to rename {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: StoreError,
    },

    /// Rename phase 2 (remove the old key) failed after a successful copy.
    ///
    /// Both the old and the new object exist in the store. This state is
    /// surfaced to the user rather than auto-corrected; a rollback delete
    /// would introduce its own failure mode.
    #[error("renamed copy exists at {to} but the original {from} could not be removed: {source}")]
    RemoveAfterCopy {
        from: String,
        to: String,
        #[source]
        source: StoreError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_key() {
        let err = StoreError::NotFound("u1/missing.txt".to_string());
        assert_eq!(err.to_string(), "object not found: u1/missing.txt");
    }

    #[test]
    fn already_exists_displays_key() {
        let err = StoreError::AlreadyExists("u1/dup.txt".to_string());
        assert_eq!(err.to_string(), "object already exists: u1/dup.txt");
    }

    #[test]
    fn invalid_key_displays_message() {
        let err = StoreError::InvalidKey("../evil".to_string());
        assert_eq!(err.to_string(), "invalid object key: ../evil");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
        assert!(store_err.to_string().contains("gone"));
    }

    #[test]
    fn validation_displays_message_verbatim() {
        let err = RegistryError::Validation("new file name must not be empty".to_string());
        assert_eq!(err.to_string(), "new file name must not be empty");
    }

    #[test]
    fn list_error_wraps_store_error() {
        let err = RegistryError::List(StoreError::Backend("timeout".to_string()));
        assert_eq!(
            err.to_string(),
            "failed to list files: storage backend error: timeout"
        );
    }

    #[test]
    fn remove_after_copy_names_both_keys() {
        let err = RegistryError::RemoveAfterCopy {
            from: "u1/a.txt".to_string(),
            to: "u1/b.txt".to_string(),
            source: StoreError::Backend("denied".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("u1/a.txt"));
        assert!(msg.contains("u1/b.txt"));
    }

    #[test]
    fn error_is_debug() {
        let err = RegistryError::Validation("x".to_string());
        assert!(format!("{err:?}").contains("Validation"));
    }
}
