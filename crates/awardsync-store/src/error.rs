use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object name: {0}")]
    InvalidName(String),

    #[error("storage authentication failed: {0}")]
    Auth(String),

    #[error("storage returned {status} for {object}")]
    Server { status: u16, object: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "swift")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
