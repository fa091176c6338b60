//! Authoritative timer snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{MatchTimerRow, TimerPush};
use super::TimerStatus;

/// Last-known authoritative timer state plus the baseline it is extrapolated from.
///
/// `value` is elapsed seconds while running and remaining seconds during a
/// break. `received_at` is the producer's `updated_at` for the initial fetch
/// and the consumer's own receipt time for push-delivered snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub value: i64,
    pub status: TimerStatus,
    pub received_at: DateTime<Utc>,
    pub is_push_delivered: bool,
}

impl TimerSnapshot {
    /// Build the snapshot read once when a viewer is mounted.
    ///
    /// The baseline is the producer's stored timestamp, so producer/consumer
    /// skew is visible here. A row without `updated_at` uses `now`.
    pub fn from_initial_fetch(row: &MatchTimerRow, now: DateTime<Utc>) -> Self {
        Self {
            value: row.timer_value.unwrap_or(0),
            status: TimerStatus::from_raw(row.timer_status.as_deref()),
            received_at: row.updated_at.unwrap_or(now),
            is_push_delivered: false,
        }
    }

    /// Build a snapshot from a realtime change notification received at `now`.
    pub fn from_push(push: &TimerPush, now: DateTime<Utc>) -> Self {
        Self {
            value: push.timer_value.unwrap_or(0),
            status: TimerStatus::from_raw(push.timer_status.as_deref()),
            received_at: now,
            is_push_delivered: true,
        }
    }
}
