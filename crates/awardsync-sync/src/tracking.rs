//! Contract with the remote tracking service.

use std::path::Path;

use async_trait::async_trait;
use awardsync_core::{Filter, Record};
use serde_json::{Map, Value};

use crate::SyncError;

/// Field holding a Version's uploaded media (proxy or PDF).
pub const UPLOADED_MOVIE: &str = "sg_uploaded_movie";

/// Find/create/update/upload access to remote records.
///
/// Every call is one blocking round trip from the synchronizer's point of
/// view; implementations must not retry on their own.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    /// First record of `entity_type` matching all `filters`, with `fields`
    /// (plus `id` and `type`) populated.
    async fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> Result<Option<Record>, SyncError>;

    async fn create(
        &self,
        entity_type: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError>;

    /// Overwrite the given fields on an existing record.
    async fn update(
        &self,
        entity_type: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError>;

    /// Attach a local file to a field of a record.
    async fn upload(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
        field: &str,
        display_name: &str,
    ) -> Result<(), SyncError>;

    /// Replace the record's thumbnail image.
    async fn upload_thumbnail(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
    ) -> Result<(), SyncError>;
}
