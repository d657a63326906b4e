//! Human-readable cards for sync outcomes.

use std::fmt::Write;

use awardsync_sync::{EntryStatus, PhaseOutcome, RunOutcome, SyncReport, SyncSummary};

// ── Public API ──

/// Print the outcome of a single-entry sync as a vertical card.
pub fn print_outcome(outcome: &RunOutcome) {
    print!("{}", render_outcome(outcome));
}

pub fn print_summary(summary: &SyncSummary) {
    print!("{}", render_summary(summary));
}

// ── Rendering ──

fn render_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Disabled => "Remote updates are disabled; nothing was synced.\n".into(),
        RunOutcome::NotFound(id) => format!("No entry with id {id} in the export.\n"),
        RunOutcome::SourceFailed(reason) => format!("Could not read entries: {reason}\n"),
        RunOutcome::Synced(report) => render_report(report),
    }
}

fn render_report(report: &SyncReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", report.entry_num);
    let status = match &report.status {
        EntryStatus::Active => "active".to_string(),
        EntryStatus::Skipped => "skipped (do not sync)".to_string(),
        EntryStatus::Retired => "withdrawn".to_string(),
        EntryStatus::RetireMissing => "FAILED: no submission to withdraw".to_string(),
        EntryStatus::RetireFailed(reason) => format!("FAILED: {reason}"),
    };
    let _ = writeln!(out, "  {:<26} {}", "status", status);
    for (phase, outcome) in &report.phases {
        let text = match outcome {
            PhaseOutcome::Completed => "updated".to_string(),
            PhaseOutcome::UpToDate => "up to date".to_string(),
            PhaseOutcome::NotAvailable => "not available".to_string(),
            PhaseOutcome::Failed(reason) => format!("FAILED: {reason}"),
        };
        let _ = writeln!(out, "  {:<26} {}", phase.as_str(), text);
    }
    out
}

fn render_summary(summary: &SyncSummary) -> String {
    let mut out = String::from("=== all entries ===\n");
    let _ = writeln!(out, "  {:<26} {}", "updated", summary.succeeded);
    let _ = writeln!(out, "  {:<26} {}", "failed", summary.failed);
    let _ = writeln!(out, "  {:<26} {}", "skipped", summary.skipped);
    out
}
