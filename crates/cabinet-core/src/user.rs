//! User identity handling.

use serde::{Deserialize, Serialize};

/// The identity whose folder a registry operates on.
///
/// The identity is an explicit value threaded into every store-facing
/// component at construction time. It is never read from ambient state, so
/// a registry can only ever touch keys under its own user's prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier, which doubles as the storage prefix.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_returns_raw_string() {
        let user = UserIdentity::new("u1");
        assert_eq!(user.id(), "u1");
        assert_eq!(user.to_string(), "u1");
    }
}
