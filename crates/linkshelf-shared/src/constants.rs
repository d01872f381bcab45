/// Application name
pub const APP_NAME: &str = "Linkshelf";

/// Prefix of every signed caller token payload
pub const AUTH_CONTEXT: &str = "linkshelf-caller-v1";

/// Authorization scheme used in the `Authorization` header
pub const AUTH_SCHEME: &str = "Signature";

/// Default tolerated clock skew for caller tokens, in seconds
pub const DEFAULT_AUTH_MAX_SKEW_SECS: i64 = 300;

/// Ed25519 public key size in bytes
pub const PUBKEY_SIZE: usize = 32;

/// Maximum decoded size of a link image (1 MiB)
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Prefix of generated link ids
pub const LINK_ID_PREFIX: &str = "link_";

/// Length of the random suffix of generated link ids
pub const LINK_ID_RANDOM_LEN: usize = 9;
