//! Object storage for entry media: proxies, thumbnails and supplemental PDFs.
//!
//! A missing object is an expected outcome ([`Fetched::NotFound`]), not an
//! error; only transport and server failures surface as [`StorageError`].

use std::path::Path;

use async_trait::async_trait;

mod error;
mod fs;

pub use error::StorageError;
pub use fs::FsStore;

#[cfg(feature = "swift")]
mod swift;
#[cfg(feature = "swift")]
pub use swift::{SwiftCredentials, SwiftStore};

/// Chunk size for streamed downloads.
pub const DOWNLOAD_CHUNK_BYTES: usize = 40 * 1024 * 1024;

/// Outcome of fetching an object to local disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched {
    /// The object was written to the destination path.
    Found { bytes: u64 },
    /// The container has no such object; nothing was written.
    NotFound,
}

impl Fetched {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Read access to containers of named objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether `container/name` exists.
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError>;

    /// Stream `container/name` into `dest`, creating or truncating it.
    async fn fetch(&self, container: &str, name: &str, dest: &Path)
    -> Result<Fetched, StorageError>;
}

/// Reject names that could escape a container.
pub(crate) fn check_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.split('/').any(|part| part == ".." || part == ".") {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}
