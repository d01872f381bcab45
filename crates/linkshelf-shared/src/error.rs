use thiserror::Error;

/// Reasons a candidate URL is rejected. The `Display` text is the message
/// shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is required")]
    Required,

    #[error("URL must start with http:// or https://")]
    BadScheme,

    #[error("Invalid URL format")]
    Malformed,

    #[error("Invalid URL: missing hostname")]
    MissingHost,

    #[error("Invalid URL: hostname must be a valid domain")]
    InvalidDomain,
}

/// Local validation failures, reported before any remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("Please enter a title for your link")]
    TitleRequired,

    #[error("Image must be a base64 data:image URI")]
    InvalidImage,

    #[error("Image exceeds the 1 MiB limit")]
    ImageTooLarge,

    #[error("Name is required")]
    NameRequired,

    #[error("Link id is required")]
    IdRequired,

    #[error("Link id cannot be \".\" or \"..\"")]
    InvalidId,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed authorization header")]
    Malformed,

    #[error("Unsupported authorization scheme")]
    UnsupportedScheme,

    #[error("Invalid public key")]
    InvalidKey,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token timestamp outside the accepted window")]
    Expired,
}
