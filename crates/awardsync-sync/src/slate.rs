//! Slate images: title cards rendered by the web application.

use async_trait::async_trait;

use crate::SyncError;

/// Which slate to render for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlateVariant {
    /// The entry's own title slate.
    Entry,
    /// The slate shown before the before/after reel.
    BeforeAfter,
}

impl SlateVariant {
    pub const ALL: [SlateVariant; 2] = [SlateVariant::Entry, SlateVariant::BeforeAfter];

    /// Path segment used by the slate service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::BeforeAfter => "bna",
        }
    }

    /// Submission field the slate is attached to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Entry => "sg_entry_slate",
            Self::BeforeAfter => "sg_bna_slate",
        }
    }

    pub fn file_name(&self, entry_num: &str) -> String {
        match self {
            Self::Entry => format!("{entry_num}.slateEntry.png"),
            Self::BeforeAfter => format!("{entry_num}.slateBNA.png"),
        }
    }
}

/// Renders slate PNGs for an entry.
#[async_trait]
pub trait SlateRenderer: Send + Sync {
    async fn render(&self, entry_id: i64, variant: SlateVariant) -> Result<Vec<u8>, SyncError>;
}

#[cfg(feature = "http")]
pub use self::web::HttpSlateRenderer;

#[cfg(feature = "http")]
mod web {
    use tracing::debug;

    use super::*;

    /// Fetches slates from the web application at
    /// `{base_url}/{entry_id}/{entry|bna}.png`.
    pub struct HttpSlateRenderer {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpSlateRenderer {
        pub fn new(base_url: &str) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }
        }

        pub fn slate_url(&self, entry_id: i64, variant: SlateVariant) -> String {
            format!("{}/{}/{}.png", self.base_url, entry_id, variant.as_str())
        }
    }

    #[async_trait]
    impl SlateRenderer for HttpSlateRenderer {
        async fn render(
            &self,
            entry_id: i64,
            variant: SlateVariant,
        ) -> Result<Vec<u8>, SyncError> {
            let url = self.slate_url(entry_id, variant);
            debug!(url = %url, "rendering slate");
            let resp = self.client.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SyncError::Slate(format!(
                    "{url} returned {}",
                    status.as_u16()
                )));
            }
            Ok(resp.bytes().await?.to_vec())
        }
    }
}
