use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the filesystem object store. Each user's files
    /// live under `<root>/<username>/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_login_rpm")]
    pub login_requests_per_minute: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_ttl_hours: 24,
        }
    }
}

fn default_jwt_ttl_hours() -> u64 { 24 }
fn default_login_rpm() -> u32 { 5 }

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { login_requests_per_minute: default_login_rpm() }
    }
}

impl RateLimitConfig {
    /// Seconds between replenished login attempts for the per-IP limiter.
    /// Clamped to at least one second: the governor rejects a zero period,
    /// which the integer division would produce above 60 requests/minute.
    pub fn replenish_period_secs(&self) -> u64 {
        u64::from((60 / self.login_requests_per_minute.max(1)).max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:9090".parse().unwrap()
}

fn default_max_upload_size_mb() -> usize { 50 }

fn default_root() -> PathBuf {
    PathBuf::from("./cabinet-data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_upload_size_mb: default_max_upload_size_mb(),
        }
    }
}

impl ServerConfig {
    pub fn find_user(&self, username: &str) -> Option<&UserConfig> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Returns `true` if any authentication is configured. With no users
    /// configured the server runs in anonymous dev mode.
    pub fn has_auth(&self) -> bool {
        !self.users.is_empty()
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("CABINET_WEB_CONFIG")
            .map(PathBuf::from)
            .ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            ServerConfig {
                bind_addr: default_bind_addr(),
                storage: StorageConfig::default(),
                auth: AuthConfig::default(),
                rate_limit: RateLimitConfig::default(),
                tls: TlsConfig::default(),
                users: Vec::new(),
            }
        };

        if let Ok(secret) = std::env::var("CABINET_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if config.auth.jwt_secret.is_empty() {
            config.auth.jwt_secret = uuid::Uuid::new_v4().to_string();
            tracing::warn!(
                "No JWT secret configured. Generated random secret (will change on restart)."
            );
        }

        if let Ok(root) = std::env::var("CABINET_STORAGE_ROOT") {
            config.storage.root = PathBuf::from(root);
        }

        if let Ok(val) = std::env::var("CABINET_MAX_UPLOAD_SIZE_MB") {
            if let Ok(mb) = val.parse::<usize>() {
                config.storage.max_upload_size_mb = mb;
            }
        }

        if let Ok(addr) = std::env::var("CABINET_BIND_ADDR") {
            config.bind_addr = addr.parse()?;
        }

        if let Ok(cert) = std::env::var("CABINET_TLS_CERT") {
            config.tls.cert_path = Some(cert);
        }
        if let Ok(key) = std::env::var("CABINET_TLS_KEY") {
            config.tls.key_path = Some(key);
        }

        // Security: validate JWT secret strength when auth is enabled
        if config.has_auth() {
            const WEAK_SECRETS: &[&str] = &[
                "change-me-to-a-random-secret",
                "secret",
                "password",
                "jwt-secret",
            ];
            if WEAK_SECRETS.iter().any(|&w| config.auth.jwt_secret == w) {
                anyhow::bail!(
                    "JWT secret matches a known weak/placeholder value. \
                     Set a strong random secret via CABINET_JWT_SECRET environment variable."
                );
            }
            if config.auth.jwt_secret.len() < 32 {
                tracing::warn!(
                    "JWT secret is shorter than 32 characters. \
                     Consider using a stronger secret via CABINET_JWT_SECRET."
                );
            }
        }

        // Security: restrict binding when no auth is configured
        if !config.has_auth() && config.bind_addr.ip().is_unspecified() {
            if std::env::var("CABINET_INSECURE").is_ok() {
                tracing::warn!(
                    "Running WITHOUT authentication on all interfaces ({}). \
                     Anyone on the network can read and write the stored files!",
                    config.bind_addr
                );
            } else {
                let safe_addr: SocketAddr =
                    ([127, 0, 0, 1], config.bind_addr.port()).into();
                tracing::warn!(
                    "No authentication configured. Binding to {} instead of {} for safety. \
                     Set CABINET_INSECURE=1 to override (NOT RECOMMENDED).",
                    safe_addr, config.bind_addr
                );
                config.bind_addr = safe_addr;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let toml = r#"
            bind_addr = "127.0.0.1:8080"

            [storage]
            root = "/srv/cabinet"
            max_upload_size_mb = 10

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
            jwt_ttl_hours = 6

            [[users]]
            username = "u1"
            password_hash = "$argon2id$dummy"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage.root, PathBuf::from("/srv/cabinet"));
        assert_eq!(config.storage.max_upload_size_mb, 10);
        assert_eq!(config.auth.jwt_ttl_hours, 6);
        assert!(config.has_auth());
        assert!(config.find_user("u1").is_some());
        assert!(config.find_user("u2").is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();

        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.storage.max_upload_size_mb, 50);
        assert_eq!(config.auth.jwt_ttl_hours, 24);
        assert_eq!(config.rate_limit.login_requests_per_minute, 5);
        assert!(!config.has_auth());
    }

    #[test]
    fn replenish_period_never_reaches_zero() {
        let fast = RateLimitConfig { login_requests_per_minute: 120 };
        assert_eq!(fast.replenish_period_secs(), 1);

        let zero = RateLimitConfig { login_requests_per_minute: 0 };
        assert_eq!(zero.replenish_period_secs(), 60);

        assert_eq!(RateLimitConfig::default().replenish_period_secs(), 12);
    }
}
