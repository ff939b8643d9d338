use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::Mutex;

use cabinet_core::{FileRegistry, ObjectStore, UserIdentity};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn ObjectStore>,
    /// One registry per user, created lazily. The mutex serializes all
    /// registry operations for a user, so overlapping refreshes cannot
    /// interleave.
    pub registries: Arc<DashMap<String, Arc<Mutex<FileRegistry>>>>,
    /// Revoked JWT token IDs (jti). Tokens in this map are rejected by the auth middleware.
    pub revoked_tokens: Arc<DashMap<String, Instant>>,
}

impl AppState {
    pub fn registry_for(&self, username: &str) -> Arc<Mutex<FileRegistry>> {
        self.registries
            .entry(username.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(FileRegistry::new(
                    self.store.clone(),
                    UserIdentity::new(username),
                )))
            })
            .clone()
    }
}
