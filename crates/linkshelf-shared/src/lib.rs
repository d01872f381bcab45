//! # linkshelf-shared
//!
//! Types shared by the Linkshelf server, store and client: the link model,
//! URL and draft validation, caller identities and the signed caller tokens
//! the server authenticates requests with.

pub mod auth;
pub mod constants;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod types;
pub mod validate;

pub use error::{AuthError, UrlError, ValidationError};
pub use types::{generate_link_id, Link, LinkRecord, Principal, UserProfile, UserRole};
pub use validate::{url_error, validate_id, validate_link, validate_profile, validate_url};
