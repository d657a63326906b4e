//! Run-time arithmetic for Submission totals.

/// Frames per second used by the judging schedule.
const FRAMES_PER_SECOND: i64 = 24;

/// Multiplier baked into every run-time value already in the tracking project.
const LEGACY_RUN_TIME_FACTOR: i64 = 42;

/// Convert a probed duration into the stored run-time value.
///
/// Fractional seconds are truncated before scaling: `5.9` → `5 × 24 × 42`.
pub fn scaled_run_time(duration_secs: f64) -> i64 {
    (duration_secs.max(0.0) as i64)
        .saturating_mul(FRAMES_PER_SECOND)
        .saturating_mul(LEGACY_RUN_TIME_FACTOR)
}

/// Total run time from the two per-variant values.
///
/// Returns `None` when neither is set, meaning the total must be left alone.
pub fn total_run_time(entry: Option<i64>, alternate: Option<i64>) -> Option<i64> {
    match (entry, alternate) {
        (Some(a), Some(b)) => Some(a.saturating_add(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
