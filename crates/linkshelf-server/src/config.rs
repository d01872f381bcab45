//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use linkshelf_shared::constants::{DEFAULT_AUTH_MAX_SKEW_SECS, DEFAULT_HTTP_PORT};
use linkshelf_store::{Database, StoreError};

/// Where the link database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Platform data directory (see [`linkshelf_store::database::default_path`]).
    Default,
    /// Explicit file path.
    Path(PathBuf),
    /// Non-persistent, lost on shutdown.
    InMemory,
}

impl DatabaseLocation {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" => Self::Default,
            ":memory:" => Self::InMemory,
            path => Self::Path(PathBuf::from(path)),
        }
    }

    pub fn open(&self) -> Result<Database, StoreError> {
        match self {
            Self::Default => Database::new(),
            Self::Path(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Database::open_at(path)
            }
            Self::InMemory => Database::open_in_memory(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database location.
    /// Env: `DATABASE_PATH` (a file path, or `:memory:`)
    /// Default: platform data directory.
    pub database: DatabaseLocation,

    /// Accepted clock skew for signed caller tokens, in seconds.
    /// Env: `AUTH_MAX_SKEW_SECS`
    /// Default: `300`
    pub auth_max_skew_secs: i64,

    /// Maximum request body size in bytes. Links may carry an inline image.
    /// Env: `MAX_BODY_BYTES`
    /// Default: 4 MiB
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database: DatabaseLocation::Default,
            auth_max_skew_secs: DEFAULT_AUTH_MAX_SKEW_SECS,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database = DatabaseLocation::parse(&path);
        }

        if let Some(val) = lookup("AUTH_MAX_SKEW_SECS") {
            match val.parse::<i64>() {
                Ok(n) if n > 0 => config.auth_max_skew_secs = n,
                _ => tracing::warn!(value = %val, "Invalid AUTH_MAX_SKEW_SECS, using default"),
            }
        }

        if let Some(val) = lookup("MAX_BODY_BYTES") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_body_bytes = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_BODY_BYTES, using default"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.database, DatabaseLocation::Default);
        assert_eq!(config.auth_max_skew_secs, 300);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/links.db"),
            ("AUTH_MAX_SKEW_SECS", "60"),
            ("MAX_BODY_BYTES", "1024"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(
            config.database,
            DatabaseLocation::Path(PathBuf::from("/tmp/links.db"))
        );
        assert_eq!(config.auth_max_skew_secs, 60);
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("AUTH_MAX_SKEW_SECS", "-5"),
            ("MAX_BODY_BYTES", "lots"),
        ]);
        let default = ServerConfig::default();
        assert_eq!(config.http_addr, default.http_addr);
        assert_eq!(config.auth_max_skew_secs, default.auth_max_skew_secs);
        assert_eq!(config.max_body_bytes, default.max_body_bytes);
    }

    #[test]
    fn test_memory_database() {
        let config = from_pairs(&[("DATABASE_PATH", ":memory:")]);
        assert_eq!(config.database, DatabaseLocation::InMemory);
        assert!(config.database.open().is_ok());
    }

    #[test]
    fn test_file_database_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("links.db");
        let location = DatabaseLocation::Path(path.clone());
        location.open().unwrap();
        assert!(path.exists());
    }
}
