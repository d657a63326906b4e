//! Media and supplemental phases: proxy and PDF Versions on a submission.

use std::path::Path;

use awardsync_core::remote::entity;
use awardsync_core::runtime::scaled_run_time;
use awardsync_core::{Entry, MediaFile, MediaVariant};
use awardsync_store::Fetched;
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::synchronizer::{EntrySynchronizer, PhaseOutcome};
use crate::{SyncError, UPLOADED_MOVIE};

const VERSION_FIELDS: &[&str] = &[
    "image",
    "sg_supplement_form",
    "sg_entry_slate",
    "sg_bna_slate",
    UPLOADED_MOVIE,
    "sg_uploaded_bna",
];

/// Poster frame rendered for the primary media, named after its file.
fn thumbnail_name(media: &MediaFile) -> String {
    format!("{}.thumb.0720.0404.jpg", media.basename())
}

impl EntrySynchronizer<'_> {
    pub(crate) async fn sync_media(
        &self,
        entry: &Entry,
        variant: MediaVariant,
    ) -> Result<PhaseOutcome, SyncError> {
        info!(entry = %entry.entry_num, variant = variant.as_str(), "updating media");
        let submission = self.require_submission(entry).await?;

        let Some(media) = self.locator.locate(entry, variant) else {
            info!(entry = %entry.entry_num, variant = variant.as_str(), "media not present");
            return Ok(PhaseOutcome::NotAvailable);
        };
        let code = entry.media_code(variant, &media.hash, &self.config.proxy_profile);

        let version = match self.find_version(&code, VERSION_FIELDS).await? {
            Some(version) => version,
            None => {
                info!(code = %code, "creating new version");
                self.tracking
                    .create(entity::VERSION, self.version_fields(&code, submission.id))
                    .await?
            }
        };
        if version.attachment_name(UPLOADED_MOVIE) == Some(code.as_str()) {
            info!(code = %code, "version already holds this media");
            return Ok(PhaseOutcome::UpToDate);
        }

        let scratch = TempDir::new()?;
        let proxy = scratch.path().join(&code);
        let container = &self.config.containers.proxies;
        match self.storage.fetch(container, &code, &proxy).await? {
            Fetched::Found { bytes } => debug!(code = %code, bytes, "downloaded proxy"),
            Fetched::NotFound => {
                return Err(SyncError::MissingObject {
                    container: container.clone(),
                    name: code,
                });
            }
        }
        info!(code = %code, version = version.id, "uploading proxy");
        self.tracking
            .upload(entity::VERSION, version.id, &proxy, UPLOADED_MOVIE, &code)
            .await?;

        if let Err(e) = self.store_run_time(&proxy, variant, version.id).await {
            warn!(code = %code, error = %e, "could not record run time");
        }
        if variant == MediaVariant::Primary {
            if let Err(e) = self.upload_thumbnail(&media, version.id, scratch.path()).await {
                error!(code = %code, error = %e, "thumbnail upload failed");
            }
        }
        Ok(PhaseOutcome::Completed)
    }

    pub(crate) async fn sync_supplemental(&self, entry: &Entry) -> Result<PhaseOutcome, SyncError> {
        info!(entry = %entry.entry_num, "updating supplemental");
        let submission = self.require_submission(entry).await?;
        let code = entry.supplemental_code();

        if self.find_version(&code, VERSION_FIELDS).await?.is_some() {
            info!(code = %code, "supplemental version exists");
            return Ok(PhaseOutcome::UpToDate);
        }
        info!(code = %code, "creating supplemental version");
        let version = self
            .tracking
            .create(entity::VERSION, self.version_fields(&code, submission.id))
            .await?;

        let scratch = TempDir::new()?;
        let pdf = scratch.path().join(&code);
        match self
            .storage
            .fetch(&self.config.containers.pdfs, &code, &pdf)
            .await?
        {
            Fetched::NotFound => {
                info!(code = %code, "PDF not found");
                Ok(PhaseOutcome::NotAvailable)
            }
            Fetched::Found { .. } => {
                self.tracking
                    .upload(entity::VERSION, version.id, &pdf, UPLOADED_MOVIE, &code)
                    .await?;
                info!(code = %code, version = version.id, "uploaded supplemental");
                Ok(PhaseOutcome::Completed)
            }
        }
    }

    fn version_fields(&self, code: &str, submission_id: i64) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("code".into(), json!(code));
        fields.insert(
            "entity".into(),
            json!({"type": entity::SUBMISSION, "id": submission_id}),
        );
        fields.insert("project".into(), self.project.to_value());
        fields
    }

    async fn store_run_time(
        &self,
        proxy: &Path,
        variant: MediaVariant,
        version_id: i64,
    ) -> Result<(), SyncError> {
        let secs = self.probe.duration_secs(proxy).await?;
        let run_time = scaled_run_time(secs);
        let mut fields = Map::new();
        fields.insert(variant.run_time_field().into(), json!(run_time));
        self.tracking
            .update(entity::VERSION, version_id, fields)
            .await?;
        debug!(version = version_id, run_time, "stored run time");
        Ok(())
    }

    async fn upload_thumbnail(
        &self,
        media: &MediaFile,
        version_id: i64,
        scratch: &Path,
    ) -> Result<(), SyncError> {
        let name = thumbnail_name(media);
        let thumb = scratch.join(&name);
        let container = &self.config.containers.thumbnails;
        if !self.storage.exists(container, &name).await? {
            warn!(thumbnail = %name, "thumbnail not found");
            return Ok(());
        }
        if let Fetched::NotFound = self.storage.fetch(container, &name, &thumb).await? {
            warn!(thumbnail = %name, "thumbnail not found");
            return Ok(());
        }
        self.tracking
            .upload_thumbnail(entity::VERSION, version_id, &thumb)
            .await?;
        debug!(thumbnail = %name, version = version_id, "uploaded thumbnail");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_named_after_primary_file() {
        let media = MediaFile {
            hash: "abc".into(),
            name: "uploads/harbour_v3.mov".into(),
        };
        assert_eq!(thumbnail_name(&media), "harbour_v3.mov.thumb.0720.0404.jpg");
    }
}
