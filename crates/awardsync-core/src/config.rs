//! Process-wide synchronizer configuration, built once at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::remote::EntityRef;

/// Object-storage containers holding the web application's media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Containers {
    /// Transcoded proxies, named by media code.
    pub proxies: String,
    /// Poster-frame thumbnails, named after the primary media file.
    pub thumbnails: String,
    /// Supplemental PDFs, named by supplemental code.
    pub pdfs: String,
}

/// How production companies are resolved against the tracking service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyMode {
    /// Historical behaviour: a company record is created only when the
    /// lookup *finds* one with a non-empty code; a miss links nothing.
    #[default]
    Legacy,
    /// Reuse the found record, create one on a miss.
    LookupOrCreate,
}

impl CompanyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::LookupOrCreate => "lookup-or-create",
        }
    }
}

impl fmt::Display for CompanyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "lookup-or-create" => Ok(Self::LookupOrCreate),
            other => Err(format!(
                "unknown company mode {other:?} (expected legacy or lookup-or-create)"
            )),
        }
    }
}

/// Immutable settings shared by every sync in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// When false, entry points log a warning and touch nothing remote.
    pub update_remote: bool,
    /// Tracking-service project the awards season lives in.
    pub project_id: i64,
    /// Proxy transcode profile name embedded in media codes.
    pub proxy_profile: String,
    pub containers: Containers,
    #[serde(default)]
    pub company_mode: CompanyMode,
}

impl SyncConfig {
    pub fn project(&self) -> EntityRef {
        EntityRef::project(self.project_id)
    }
}
