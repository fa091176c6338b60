//! Rendered clock shown to viewers

use serde::{Deserialize, Serialize};

use super::TimerStatus;

/// What a viewer sees for one match at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClockDisplay {
    /// False until a snapshot has been received
    pub available: bool,
    pub seconds: u64,
    /// `MM:SS`, minutes are not wrapped at 60
    pub formatted: String,
    pub label: String,
    pub status: Option<TimerStatus>,
    pub finished: bool,
}

impl MatchClockDisplay {
    /// Render a projected time. A finished match is labelled `FINISHED`
    /// whatever the timer status says.
    pub fn new(seconds: u64, status: TimerStatus, finished: bool) -> Self {
        Self {
            available: true,
            seconds,
            formatted: format_clock(seconds),
            label: label_for(status, finished).to_string(),
            status: Some(status),
            finished,
        }
    }

    /// Display for a viewer that has no snapshot yet
    pub fn unavailable(finished: bool) -> Self {
        Self {
            available: false,
            seconds: 0,
            formatted: format_clock(0),
            label: if finished { "FINISHED" } else { "NO TIMER" }.to_string(),
            status: None,
            finished,
        }
    }
}

fn label_for(status: TimerStatus, finished: bool) -> &'static str {
    if finished {
        return "FINISHED";
    }
    match status {
        TimerStatus::Running => "LIVE",
        TimerStatus::Paused => "PAUSED",
        TimerStatus::Break => "BREAK",
        TimerStatus::Stopped => "STOPPED",
    }
}

/// Format seconds as `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(425), "07:05");
        assert_eq!(format_clock(3665), "61:05");
    }

    #[test]
    fn labels_follow_status() {
        assert_eq!(MatchClockDisplay::new(1, TimerStatus::Running, false).label, "LIVE");
        assert_eq!(MatchClockDisplay::new(1, TimerStatus::Paused, false).label, "PAUSED");
        assert_eq!(MatchClockDisplay::new(1, TimerStatus::Break, false).label, "BREAK");
        assert_eq!(MatchClockDisplay::new(1, TimerStatus::Stopped, false).label, "STOPPED");
    }

    #[test]
    fn finished_overrides_status() {
        for status in [TimerStatus::Running, TimerStatus::Paused, TimerStatus::Break, TimerStatus::Stopped] {
            let display = MatchClockDisplay::new(420, status, true);
            assert_eq!(display.label, "FINISHED");
            assert_eq!(display.seconds, 420);
        }
    }

    #[test]
    fn unavailable_display_is_zeroed() {
        let display = MatchClockDisplay::unavailable(false);
        assert!(!display.available);
        assert_eq!(display.seconds, 0);
        assert_eq!(display.formatted, "00:00");
        assert_eq!(display.label, "NO TIMER");
        assert_eq!(display.status, None);
    }
}
