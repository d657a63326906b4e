//! Process settings: clap arguments with environment fallbacks, and the
//! collaborators built from them.

use std::path::PathBuf;

use anyhow::Context;
use awardsync_core::{CompanyMode, Containers, SyncConfig};
use awardsync_store::{FsStore, ObjectStore, SwiftCredentials, SwiftStore};
use awardsync_sync::FfprobeProbe;
use awardsync_sync::HttpSlateRenderer;
use awardsync_sync::http::{ShotgunClient, ShotgunCredentials};
use clap::{ArgAction, Args};

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// JSON export of entries from the awards web application
    #[arg(long, env = "AWARDSYNC_ENTRIES", default_value = "entries.json")]
    pub entries: PathBuf,

    /// Push changes to the tracking service (`false` logs and exits)
    #[arg(long, env = "AWARDSYNC_UPDATE_REMOTE", default_value_t = true, action = ArgAction::Set)]
    pub update_remote: bool,

    /// Tracking service site URL
    #[arg(long, env = "SHOTGUN_URL", default_value = "https://ves.shotgunstudio.com")]
    pub shotgun_url: String,

    /// Script name used to authenticate with the tracking service
    #[arg(long, env = "SHOTGUN_SCRIPT_NAME")]
    pub script_name: String,

    #[arg(long, env = "SHOTGUN_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Project the awards season lives in
    #[arg(long, env = "SHOTGUN_PROJECT_ID")]
    pub project_id: i64,

    /// Transcode profile embedded in proxy names
    #[arg(long, env = "AWARDSYNC_PROXY_PROFILE", default_value = "h264_720")]
    pub proxy_profile: String,

    #[arg(long, env = "AWARDSYNC_PROXY_CONTAINER", default_value = "proxies")]
    pub proxy_container: String,

    #[arg(long, env = "AWARDSYNC_THUMBS_CONTAINER", default_value = "thumbs")]
    pub thumbs_container: String,

    #[arg(long, env = "AWARDSYNC_PDF_CONTAINER", default_value = "pdfs")]
    pub pdf_container: String,

    /// Read containers from this directory instead of object storage
    #[arg(long, env = "AWARDSYNC_MEDIA_ROOT")]
    pub media_root: Option<PathBuf>,

    #[arg(long, env = "SWIFT_AUTH_URL")]
    pub swift_auth_url: Option<String>,

    #[arg(long, env = "SWIFT_USER")]
    pub swift_user: Option<String>,

    #[arg(long, env = "SWIFT_KEY", hide_env_values = true)]
    pub swift_key: Option<String>,

    /// Base URL the web application serves slates from
    #[arg(long, env = "AWARDSYNC_SLATE_URL")]
    pub slate_url: String,

    #[arg(long, env = "AWARDSYNC_FFPROBE", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    /// `legacy` or `lookup-or-create`
    #[arg(long, env = "AWARDSYNC_COMPANY_MODE", default_value = "legacy")]
    pub company_mode: CompanyMode,
}

impl Settings {
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            update_remote: self.update_remote,
            project_id: self.project_id,
            proxy_profile: self.proxy_profile.clone(),
            containers: Containers {
                proxies: self.proxy_container.clone(),
                thumbnails: self.thumbs_container.clone(),
                pdfs: self.pdf_container.clone(),
            },
            company_mode: self.company_mode,
        }
    }

    pub fn tracking(&self) -> ShotgunClient {
        ShotgunClient::new(
            &self.shotgun_url,
            ShotgunCredentials {
                script_name: self.script_name.clone(),
                api_key: self.api_key.clone(),
            },
        )
    }

    /// Filesystem containers when `--media-root` is set, Swift otherwise.
    pub fn storage(&self) -> anyhow::Result<Box<dyn ObjectStore>> {
        if let Some(root) = &self.media_root {
            return Ok(Box::new(FsStore::new(root)));
        }
        let credentials = SwiftCredentials {
            auth_url: self
                .swift_auth_url
                .clone()
                .context("SWIFT_AUTH_URL is required unless --media-root is given")?,
            user: self.swift_user.clone().context("SWIFT_USER is required")?,
            key: self.swift_key.clone().context("SWIFT_KEY is required")?,
        };
        Ok(Box::new(SwiftStore::new(credentials)))
    }

    pub fn slates(&self) -> HttpSlateRenderer {
        HttpSlateRenderer::new(&self.slate_url)
    }

    pub fn probe(&self) -> FfprobeProbe {
        FfprobeProbe::new(&self.ffprobe)
    }
}
