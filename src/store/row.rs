//! Persisted match timer row

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The columns of a match row the timer cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTimerRow {
    #[serde(alias = "id")]
    pub match_id: String,
    #[serde(default)]
    pub timer_value: Option<i64>,
    #[serde(default)]
    pub timer_status: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Match lifecycle status (`scheduled`, `live`, `completed`...)
    #[serde(default, rename = "status")]
    pub match_status: Option<String>,
}

impl MatchTimerRow {
    pub fn new(match_id: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            timer_value: None,
            timer_status: None,
            updated_at: None,
            match_status: None,
        }
    }

    /// Whether the match itself is over, independent of timer status
    pub fn is_finished(&self) -> bool {
        is_finished_status(self.match_status.as_deref())
    }
}

pub(crate) fn is_finished_status(status: Option<&str>) -> bool {
    matches!(
        status.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("completed") | Some("finished")
    )
}
