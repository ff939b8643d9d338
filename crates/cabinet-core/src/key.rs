//! Object key convention.
//!
//! Every object is stored under `{userId}/{fileName}`. Listing is always
//! scoped to the `{userId}` prefix and per-file keys are derived by plain
//! concatenation. This convention is the access-control boundary between
//! users and must not change shape.

use crate::error::{StoreError, StoreResult};
use crate::user::UserIdentity;

/// Builds the storage key for one of a user's files: `{userId}/{fileName}`.
pub fn object_key(user: &UserIdentity, file_name: &str) -> String {
    format!("{}/{}", user.id(), file_name)
}

/// Validates a user-supplied file name before it becomes part of a key.
///
/// Rejects names that are empty after trimming, that could escape the
/// user's folder (`/`, `\`, `..`), or that contain control characters
/// (they would corrupt HTTP headers the name is echoed into, such as
/// `Content-Disposition`).
pub fn validate_file_name(name: &str) -> StoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidKey("file name is empty".to_string()));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey(
            "file name must not contain control characters".to_string(),
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(StoreError::InvalidKey(format!(
            "file name must not contain path separators: {trimmed}"
        )));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains("..") {
        return Err(StoreError::InvalidKey(format!(
            "file name must not contain '..': {trimmed}"
        )));
    }
    Ok(())
}
