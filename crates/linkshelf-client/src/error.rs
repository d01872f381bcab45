use thiserror::Error;

use linkshelf_shared::ValidationError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The remote call failed. The message is whatever the server (or the
    /// transport) reported.
    #[error("{0}")]
    Remote(String),

    #[error("Key file error: {0}")]
    KeyFile(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Remote(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
