//! Per-entry synchronization: status check, then the phases a caller
//! switched on, each recorded in a [`SyncReport`].

use std::fmt;

use awardsync_core::remote::{WITHDRAWN_STATUS, entity};
use awardsync_core::runtime::total_run_time;
use awardsync_core::{EntityRef, Entry, Filter, MediaVariant, Record, SyncConfig};
use awardsync_store::ObjectStore;
use serde_json::{Map, json};
use tracing::{debug, error, info, warn};

use crate::{MediaLocator, MediaProbe, SlateRenderer, SyncError, TrackingClient};

/// Independent switches for the phases after the status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub details: bool,
    pub primary_media: bool,
    pub alternate_media: bool,
    pub supplemental: bool,
}

impl Phases {
    pub fn all() -> Self {
        Self {
            details: true,
            primary_media: true,
            alternate_media: true,
            supplemental: true,
        }
    }

    pub fn details_only() -> Self {
        Self {
            details: true,
            primary_media: false,
            alternate_media: false,
            supplemental: false,
        }
    }

    fn any_media(&self) -> bool {
        self.primary_media || self.alternate_media
    }
}

impl Default for Phases {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Details,
    PrimaryMedia,
    AlternateMedia,
    Supplemental,
    RunTimes,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::PrimaryMedia => "primary media",
            Self::AlternateMedia => "alternate media",
            Self::Supplemental => "supplemental",
            Self::RunTimes => "run times",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOutcome {
    /// Remote state was created or changed.
    Completed,
    /// Remote state already matched; nothing was uploaded.
    UpToDate,
    /// The local media or document does not exist.
    NotAvailable,
    Failed(String),
}

impl PhaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of the status check that gates every other phase.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    Active,
    /// Marked do-not-sync; nothing remote was touched.
    Skipped,
    /// Deleted locally; the submission was withdrawn.
    Retired,
    /// Deleted locally but no submission carries the code.
    RetireMissing,
    /// Deleted locally; withdrawing the submission failed.
    RetireFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub entry_num: String,
    pub status: EntryStatus,
    pub phases: Vec<(Phase, PhaseOutcome)>,
}

impl SyncReport {
    fn new(entry_num: &str, status: EntryStatus) -> Self {
        Self {
            entry_num: entry_num.to_string(),
            status,
            phases: Vec::new(),
        }
    }

    pub fn outcome(&self, phase: Phase) -> Option<&PhaseOutcome> {
        self.phases
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, outcome)| outcome)
    }

    pub fn is_success(&self) -> bool {
        !matches!(
            self.status,
            EntryStatus::RetireMissing | EntryStatus::RetireFailed(_)
        ) && !self.phases.iter().any(|(_, outcome)| outcome.is_failure())
    }

    /// Process exit code: 1 when anything failed.
    pub fn failure_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Brings one local entry's remote state up to date.
///
/// Holds only borrowed configuration and collaborators; all work happens
/// sequentially inside [`EntrySynchronizer::sync`].
pub struct EntrySynchronizer<'a> {
    pub(crate) config: &'a SyncConfig,
    pub(crate) project: EntityRef,
    pub(crate) tracking: &'a dyn TrackingClient,
    pub(crate) storage: &'a dyn ObjectStore,
    pub(crate) slates: &'a dyn SlateRenderer,
    pub(crate) probe: &'a dyn MediaProbe,
    pub(crate) locator: &'a dyn MediaLocator,
}

impl<'a> EntrySynchronizer<'a> {
    pub fn new(
        config: &'a SyncConfig,
        tracking: &'a dyn TrackingClient,
        storage: &'a dyn ObjectStore,
        slates: &'a dyn SlateRenderer,
        probe: &'a dyn MediaProbe,
        locator: &'a dyn MediaLocator,
    ) -> Self {
        Self {
            config,
            project: config.project(),
            tracking,
            storage,
            slates,
            probe,
            locator,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        self.config
    }

    pub async fn sync(&self, entry: &Entry, phases: Phases) -> SyncReport {
        info!(entry = %entry.entry_num, id = entry.id, "syncing entry");
        let status = self.check_status(entry).await;
        let mut report = SyncReport::new(&entry.entry_num, status);
        if report.status != EntryStatus::Active {
            return report;
        }

        if phases.details {
            let result = self.sync_details(entry).await;
            let stop = matches!(result, Err(SyncError::MissingReference { .. }));
            record(&mut report, Phase::Details, result);
            if stop {
                warn!(entry = %entry.entry_num, "skipping remaining phases");
                return report;
            }
        }
        if phases.primary_media {
            let result = self.sync_media(entry, MediaVariant::Primary).await;
            record(&mut report, Phase::PrimaryMedia, result);
        }
        if phases.alternate_media {
            let result = self.sync_media(entry, MediaVariant::Alternate).await;
            record(&mut report, Phase::AlternateMedia, result);
        }
        if phases.supplemental {
            let result = self.sync_supplemental(entry).await;
            record(&mut report, Phase::Supplemental, result);
        }
        if phases.any_media() {
            let result = self.update_run_times(entry).await;
            record(&mut report, Phase::RunTimes, result);
        }
        report
    }

    async fn check_status(&self, entry: &Entry) -> EntryStatus {
        if entry.do_not_sync {
            info!(entry = %entry.entry_num, "entry is marked do-not-sync, skipping");
            return EntryStatus::Skipped;
        }
        if !entry.deleted {
            debug!(entry = %entry.entry_num, "status is current");
            return EntryStatus::Active;
        }

        info!(entry = %entry.entry_num, "entry was deleted, withdrawing submission");
        match self.retire(entry).await {
            Ok(Some(id)) => {
                info!(entry = %entry.entry_num, submission = id, "submission withdrawn");
                EntryStatus::Retired
            }
            Ok(None) => {
                error!(entry = %entry.entry_num, "could not retire: no submission with this code");
                EntryStatus::RetireMissing
            }
            Err(e) => {
                error!(entry = %entry.entry_num, error = %e, "could not retire");
                EntryStatus::RetireFailed(e.to_string())
            }
        }
    }

    async fn retire(&self, entry: &Entry) -> Result<Option<i64>, SyncError> {
        let Some(submission) = self.find_submission(entry, &["id"]).await? else {
            return Ok(None);
        };
        let mut fields = Map::new();
        fields.insert("sg_status_list".into(), json!(WITHDRAWN_STATUS));
        self.tracking
            .update(entity::SUBMISSION, submission.id, fields)
            .await?;
        Ok(Some(submission.id))
    }

    /// Sum the submission's per-variant run times into its total.
    async fn update_run_times(&self, entry: &Entry) -> Result<PhaseOutcome, SyncError> {
        let submission = self
            .find_submission(
                entry,
                &["sg_entry_run_time", "sg_ba_run_time", "sg_total_run_time"],
            )
            .await?
            .ok_or_else(|| SyncError::MissingSubmission(entry.entry_num.clone()))?;

        let total = total_run_time(
            submission.get_i64(MediaVariant::Primary.run_time_field()),
            submission.get_i64(MediaVariant::Alternate.run_time_field()),
        );
        let Some(total) = total else {
            debug!(entry = %entry.entry_num, "no run times recorded yet");
            return Ok(PhaseOutcome::NotAvailable);
        };

        let mut fields = Map::new();
        fields.insert("sg_total_run_time".into(), json!(total));
        self.tracking
            .update(entity::SUBMISSION, submission.id, fields)
            .await?;
        info!(entry = %entry.entry_num, total, "updated total run time");
        Ok(PhaseOutcome::Completed)
    }

    // ── Lookups ──

    /// `find_one` scoped to the configured project.
    pub(crate) async fn find_in_project(
        &self,
        entity_type: &str,
        mut filters: Vec<Filter>,
        fields: &[&str],
    ) -> Result<Option<Record>, SyncError> {
        filters.push(Filter::in_project(&self.project));
        self.tracking.find_one(entity_type, &filters, fields).await
    }

    pub(crate) async fn find_submission(
        &self,
        entry: &Entry,
        fields: &[&str],
    ) -> Result<Option<Record>, SyncError> {
        self.find_in_project(
            entity::SUBMISSION,
            vec![Filter::is("code", entry.entry_num.as_str())],
            fields,
        )
        .await
    }

    pub(crate) async fn require_submission(&self, entry: &Entry) -> Result<Record, SyncError> {
        self.find_submission(entry, &["id"])
            .await?
            .ok_or_else(|| SyncError::MissingSubmission(entry.entry_num.clone()))
    }

    pub(crate) async fn find_version(
        &self,
        code: &str,
        fields: &[&str],
    ) -> Result<Option<Record>, SyncError> {
        self.find_in_project(entity::VERSION, vec![Filter::is("code", code)], fields)
            .await
    }
}

fn record(report: &mut SyncReport, phase: Phase, result: Result<PhaseOutcome, SyncError>) {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(entry = %report.entry_num, phase = %phase, error = %e, "phase failed");
            PhaseOutcome::Failed(e.to_string())
        }
    };
    report.phases.push((phase, outcome));
}
