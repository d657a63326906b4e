//! Filesystem-backed object store: `{root}/{container}/{name}`.
//!
//! Used for local runs against a mounted copy of the media containers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{Fetched, ObjectStore, StorageError, check_name};

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, container: &str, name: &str) -> Result<PathBuf, StorageError> {
        check_name(container)?;
        check_name(name)?;
        Ok(self.root.join(container).join(name))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        let path = self.object_path(container, name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn fetch(
        &self,
        container: &str,
        name: &str,
        dest: &Path,
    ) -> Result<Fetched, StorageError> {
        let path = self.object_path(container, name)?;
        match tokio::fs::copy(&path, dest).await {
            Ok(bytes) => {
                debug!(object = %path.display(), bytes, "copied object");
                Ok(Fetched::Found { bytes })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !path.exists() => {
                Ok(Fetched::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }
}
