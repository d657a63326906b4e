//! Outer entry points: sync one entry by id, or every entry.

use tracing::{error, info, warn};

use crate::{EntrySource, EntryStatus, EntrySynchronizer, Phases, SyncReport};

/// What happened when a single entry was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Remote updates are switched off; nothing ran.
    Disabled,
    /// No entry has the requested id.
    NotFound(i64),
    /// The entry source could not be read.
    SourceFailed(String),
    Synced(SyncReport),
}

impl RunOutcome {
    pub fn failure_code(&self) -> i32 {
        match self {
            Self::Disabled => 0,
            Self::NotFound(_) | Self::SourceFailed(_) => 1,
            Self::Synced(report) => report.failure_code(),
        }
    }
}

/// Counts from a full run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Sync one entry by local id. Never panics; every failure is logged and
/// reflected in the outcome.
pub async fn sync_one(
    source: &dyn EntrySource,
    synchronizer: &EntrySynchronizer<'_>,
    entry_id: i64,
    phases: Phases,
) -> RunOutcome {
    if !synchronizer.config().update_remote {
        warn!("not updating remote tracking");
        return RunOutcome::Disabled;
    }
    let entry = match source.entry(entry_id) {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            error!(id = entry_id, "no such entry");
            return RunOutcome::NotFound(entry_id);
        }
        Err(e) => {
            error!(id = entry_id, error = %e, "could not read entry");
            return RunOutcome::SourceFailed(e.to_string());
        }
    };
    RunOutcome::Synced(synchronizer.sync(&entry, phases).await)
}

/// Sync the details of every entry, one after another. Returns `None` when
/// remote updates are switched off or the source cannot be read.
pub async fn sync_all(
    source: &dyn EntrySource,
    synchronizer: &EntrySynchronizer<'_>,
) -> Option<SyncSummary> {
    if !synchronizer.config().update_remote {
        warn!("not updating remote tracking");
        return None;
    }
    let entries = match source.entries() {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "could not read entries");
            return None;
        }
    };

    let mut summary = SyncSummary::default();
    for entry in &entries {
        let report = synchronizer.sync(entry, Phases::details_only()).await;
        if report.status == EntryStatus::Skipped {
            summary.skipped += 1;
        } else if report.is_success() {
            info!(entry = %entry.entry_num, "updated");
            summary.succeeded += 1;
        } else {
            error!(entry = %entry.entry_num, "could not update");
            summary.failed += 1;
        }
    }
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        "finished syncing all entries"
    );
    Some(summary)
}
