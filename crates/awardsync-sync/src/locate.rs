use awardsync_core::{Entry, MediaFile, MediaVariant};

/// Finds the local media behind an entry's primary or alternate variant.
pub trait MediaLocator: Send + Sync {
    fn locate(&self, entry: &Entry, variant: MediaVariant) -> Option<MediaFile>;
}

/// Reads the media the web application recorded in its export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportedMedia;

impl MediaLocator for ExportedMedia {
    fn locate(&self, entry: &Entry, variant: MediaVariant) -> Option<MediaFile> {
        let media = match variant {
            MediaVariant::Primary => entry.media.primary.as_ref(),
            MediaVariant::Alternate => entry.media.alternate.as_ref(),
        };
        media.filter(|m| !m.hash.is_empty()).cloned()
    }
}
