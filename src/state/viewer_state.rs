//! Timer state held by a single match viewer

use chrono::{DateTime, Utc};

use crate::{
    store::{MatchTimerRow, TimerPush},
    timer::{display_time, MatchClockDisplay, TimerSnapshot, TimerStatus},
};

/// Latest snapshot for one match plus the externally supplied finished flag.
///
/// This is the only mutable timer state a viewer keeps; the displayed time
/// is recomputed from it on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerState {
    snapshot: Option<TimerSnapshot>,
    finished: bool,
}

impl ViewerState {
    /// State of a viewer whose initial fetch failed or found no row
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// State built from the row read at mount
    pub fn from_row(row: &MatchTimerRow, now: DateTime<Utc>) -> Self {
        Self {
            snapshot: Some(TimerSnapshot::from_initial_fetch(row, now)),
            finished: row.is_finished(),
        }
    }

    /// Replace the snapshot wholesale with a push received at `now`.
    ///
    /// The finished flag only changes when the push carries a match status.
    pub fn apply_push(&mut self, push: &TimerPush, now: DateTime<Utc>) {
        self.snapshot = Some(TimerSnapshot::from_push(push, now));
        if push.match_status.is_some() {
            self.finished = push.is_finished();
        }
    }

    pub fn snapshot(&self) -> Option<&TimerSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> Option<TimerStatus> {
        self.snapshot.as_ref().map(|s| s.status)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a once-per-second recompute is needed
    pub fn is_ticking(&self) -> bool {
        self.status().map_or(false, |s| s.is_ticking())
    }

    /// Project the display for wall-clock time `now`
    pub fn render(&self, now: DateTime<Utc>) -> MatchClockDisplay {
        match &self.snapshot {
            Some(snapshot) => {
                MatchClockDisplay::new(display_time(snapshot, now), snapshot.status, self.finished)
            }
            None => MatchClockDisplay::unavailable(self.finished),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap()
    }

    fn push(value: i64, status: &str, match_status: Option<&str>) -> TimerPush {
        TimerPush {
            match_id: "m1".to_string(),
            timer_value: Some(value),
            timer_status: Some(status.to_string()),
            updated_at: None,
            match_status: match_status.map(str::to_string),
        }
    }

    #[test]
    fn uninitialized_renders_no_timer() {
        let state = ViewerState::uninitialized();
        let display = state.render(t0());
        assert!(!display.available);
        assert!(!state.is_ticking());
    }

    #[test]
    fn replacement_discards_previous_snapshot() {
        let mut row = MatchTimerRow::new("m1");
        row.timer_value = Some(300);
        row.timer_status = Some("running".to_string());
        row.updated_at = Some(t0() - Duration::seconds(100));
        let mut state = ViewerState::from_row(&row, t0());
        assert_eq!(state.render(t0()).seconds, 400);

        state.apply_push(&push(7, "paused", None), t0());
        assert_eq!(state.render(t0() + Duration::seconds(30)).seconds, 7);
        assert_eq!(state.snapshot().map(|s| s.is_push_delivered), Some(true));
    }

    #[test]
    fn finished_flag_sticks_until_push_says_otherwise() {
        let mut state = ViewerState::uninitialized();
        state.apply_push(&push(420, "stopped", Some("completed")), t0());
        assert_eq!(state.render(t0()).label, "FINISHED");

        state.apply_push(&push(420, "running", None), t0());
        assert!(state.is_finished());
        assert_eq!(state.render(t0()).label, "FINISHED");

        state.apply_push(&push(0, "running", Some("live")), t0());
        assert_eq!(state.render(t0()).label, "LIVE");
    }

    #[test]
    fn unknown_status_in_push_is_static() {
        let mut state = ViewerState::uninitialized();
        state.apply_push(&push(33, "exploded", None), t0());

        assert_eq!(state.status(), Some(TimerStatus::Stopped));
        assert!(!state.is_ticking());
        assert_eq!(state.render(t0() + Duration::seconds(10)).seconds, 33);
    }
}
