//! Timer status as written by the scoring side

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a match period timer.
///
/// Transitions are `stopped -> running <-> paused` and
/// `running <-> break -> running`. They are driven by the scorer; the viewer
/// only renders whichever status it is told.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Counting elapsed match time upward
    Running,
    /// Frozen mid-period
    Paused,
    /// Counting remaining break time downward
    Break,
    /// Not started, or the period is over
    #[default]
    Stopped,
}

impl TimerStatus {
    /// Parse a raw status string from a row or change payload.
    ///
    /// Missing and unrecognised values fall back to `Stopped` so a malformed
    /// payload renders as a static clock instead of failing.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("running") => Self::Running,
            Some("paused") => Self::Paused,
            Some("break") => Self::Break,
            Some("stopped") => Self::Stopped,
            Some(other) => {
                tracing::warn!("Unknown timer status '{}', treating as stopped", other);
                Self::Stopped
            }
            None => Self::Stopped,
        }
    }

    /// Whether the display must be recomputed every second in this status
    pub fn is_ticking(&self) -> bool {
        matches!(self, Self::Running | Self::Break)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Break => "break",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
