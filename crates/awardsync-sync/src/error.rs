use awardsync_store::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("could not find {entity} {key}")]
    MissingReference { entity: &'static str, key: String },

    #[error("submission {0} not found; run the details phase first")]
    MissingSubmission(String),

    #[error("object {container}/{name} not found")]
    MissingObject { container: String, name: String },

    #[error("slate rendering failed: {0}")]
    Slate(String),

    #[error("media probe failed: {0}")]
    Probe(String),

    #[error("entry source failed: {0}")]
    Source(String),
}
