//! Projection from an authoritative snapshot to the displayed time

use chrono::{DateTime, Utc};

use super::{TimerSnapshot, TimerStatus};

/// Whole seconds elapsed since the snapshot baseline, floored.
///
/// Initial-fetch snapshots clamp negative values to zero (producer clock
/// ahead of ours). Push snapshots are baselined on our own clock, so a
/// negative value there is passed through unchanged.
pub fn elapsed_since_snapshot(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - snapshot.received_at).num_milliseconds().div_euclid(1000);

    if !snapshot.is_push_delivered && elapsed < 0 {
        0
    } else {
        elapsed
    }
}

/// Seconds to display for `snapshot` at wall-clock time `now`, never negative.
pub fn display_time(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> u64 {
    let seconds = match snapshot.status {
        TimerStatus::Paused | TimerStatus::Stopped => snapshot.value,
        TimerStatus::Running => snapshot.value.saturating_add(elapsed_since_snapshot(snapshot, now)),
        TimerStatus::Break => snapshot.value.saturating_sub(elapsed_since_snapshot(snapshot, now)),
    };

    seconds.max(0) as u64
}
