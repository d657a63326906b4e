//! Media duration probing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::SyncError;

/// Reports the playback duration of a local media file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn duration_secs(&self, path: &Path) -> Result<f64, SyncError>;
}

/// Probes with the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn duration_secs(&self, path: &Path) -> Result<f64, SyncError> {
        let output = tokio::process::Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=nw=1:nk=1",
            ])
            .arg(path)
            .output()
            .await?;
        if !output.status.success() {
            return Err(SyncError::Probe(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let secs = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
        debug!(path = %path.display(), secs, "probed duration");
        Ok(secs)
    }
}

fn parse_duration(stdout: &str) -> Result<f64, SyncError> {
    let text = stdout.trim();
    text.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite())
        .ok_or_else(|| SyncError::Probe(format!("unreadable duration {text:?}")))
}
