//! Client configuration loaded from environment variables.
//!
//! Command-line flags override whatever is set here.

use std::path::PathBuf;

use directories::ProjectDirs;

use linkshelf_shared::constants::DEFAULT_HTTP_PORT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Linkshelf server.
    /// Env: `LINKSHELF_SERVER_URL`
    /// Default: `http://127.0.0.1:8080`
    pub server_url: String,

    /// Where the caller's secret key is kept.
    /// Env: `LINKSHELF_KEY_PATH`
    /// Default: `<platform data dir>/identity.key`
    pub key_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: format!("http://127.0.0.1:{DEFAULT_HTTP_PORT}"),
            key_path: default_key_path(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("LINKSHELF_SERVER_URL").filter(|s| !s.trim().is_empty()) {
            config.server_url = url.trim().to_string();
        }

        if let Some(path) = lookup("LINKSHELF_KEY_PATH").filter(|s| !s.trim().is_empty()) {
            config.key_path = Some(PathBuf::from(path));
        }

        config
    }
}

/// Platform default location of the identity key.
/// - Linux: `~/.local/share/linkshelf/identity.key`
pub fn default_key_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "linkshelf", "linkshelf")
        .map(|dirs| dirs.data_dir().join("identity.key"))
}
