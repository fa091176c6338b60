//! Realtime change notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use super::{row::is_finished_status, StoreError};

/// Table whose rows carry match timers
pub const MATCHES_TABLE: &str = "matches";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change notification as delivered by the backend.
///
/// `record` is left untyped here and validated into a [`TimerPush`] before
/// anything reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub event_type: ChangeKind,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(rename = "new", default)]
    pub record: Value,
}

fn default_table() -> String {
    MATCHES_TABLE.to_string()
}

impl ChangeEvent {
    pub fn update(record: Value) -> Self {
        Self {
            event_type: ChangeKind::Update,
            table: default_table(),
            record,
        }
    }
}

/// Validated timer fields of a change record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPush {
    pub match_id: String,
    pub timer_value: Option<i64>,
    pub timer_status: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub match_status: Option<String>,
}

impl TimerPush {
    /// Validate a loosely typed change record.
    ///
    /// Only a non-object record or a missing match id is rejected. Individual
    /// fields of the wrong type are dropped so the snapshot falls back to its
    /// defaults.
    pub fn from_record(record: &Value) -> Result<Self, StoreError> {
        let fields = record
            .as_object()
            .ok_or_else(|| StoreError::InvalidRecord("record is not an object".to_string()))?;

        let match_id = match fields.get("id").or_else(|| fields.get("match_id")) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(StoreError::InvalidRecord("record has no match id".to_string())),
        };

        let timer_value = match fields.get("timer_value") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(other) => {
                warn!("Ignoring non-numeric timer_value {} for match {}", other, match_id);
                None
            }
        };

        let updated_at = fields
            .get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(Self {
            timer_value,
            timer_status: fields.get("timer_status").and_then(Value::as_str).map(str::to_string),
            updated_at,
            match_status: fields.get("status").and_then(Value::as_str).map(str::to_string),
            match_id,
        })
    }

    pub fn is_finished(&self) -> bool {
        is_finished_status(self.match_status.as_deref())
    }
}

/// Change feed scoped to `UPDATE` events on a single match row
#[derive(Debug)]
pub struct ChangeSubscription {
    match_id: String,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn new(match_id: impl Into<String>, rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            match_id: match_id.into(),
            rx,
        }
    }

    /// Wait for the next update to this match. `None` once the feed closes.
    pub async fn next(&mut self) -> Option<TimerPush> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if event.event_type != ChangeKind::Update || event.table != MATCHES_TABLE {
                        continue;
                    }
                    match TimerPush::from_record(&event.record) {
                        Ok(push) if push.match_id == self.match_id => return Some(push),
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("Dropping malformed change for match {}: {}", self.match_id, e);
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // only the newest snapshot matters, so skipping is harmless
                    debug!("Subscription for {} lagged by {} events", self.match_id, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_backend_payload() {
        let event: ChangeEvent = serde_json::from_value(json!({
            "eventType": "UPDATE",
            "table": "matches",
            "new": {"id": "m1", "timer_value": 50, "timer_status": "break", "status": "live"}
        }))
        .unwrap();

        assert_eq!(event.event_type, ChangeKind::Update);
        let push = TimerPush::from_record(&event.record).unwrap();
        assert_eq!(push.match_id, "m1");
        assert_eq!(push.timer_value, Some(50));
        assert_eq!(push.timer_status.as_deref(), Some("break"));
        assert!(!push.is_finished());
    }

    #[test]
    fn rejects_non_object_and_missing_id() {
        assert!(matches!(TimerPush::from_record(&json!([1, 2])), Err(StoreError::InvalidRecord(_))));
        assert!(matches!(
            TimerPush::from_record(&json!({"timer_value": 3})),
            Err(StoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn tolerates_loosely_typed_fields() {
        let push = TimerPush::from_record(&json!({
            "match_id": 42,
            "timer_value": "17",
            "timer_status": 5,
            "updated_at": "not a date"
        }))
        .unwrap();

        assert_eq!(push.match_id, "42");
        assert_eq!(push.timer_value, Some(17));
        assert_eq!(push.timer_status, None);
        assert_eq!(push.updated_at, None);

        let fractional = TimerPush::from_record(&json!({"id": "m", "timer_value": 12.9})).unwrap();
        assert_eq!(fractional.timer_value, Some(12));

        let bogus = TimerPush::from_record(&json!({"id": "m", "timer_value": true})).unwrap();
        assert_eq!(bogus.timer_value, None);
    }

    #[tokio::test]
    async fn subscription_filters_other_matches_and_event_kinds() {
        let (tx, rx) = broadcast::channel(16);
        let mut sub = ChangeSubscription::new("m1", rx);

        tx.send(ChangeEvent::update(json!({"id": "m2", "timer_value": 1}))).unwrap();
        tx.send(ChangeEvent {
            event_type: ChangeKind::Insert,
            table: MATCHES_TABLE.to_string(),
            record: json!({"id": "m1", "timer_value": 2}),
        })
        .unwrap();
        tx.send(ChangeEvent {
            event_type: ChangeKind::Update,
            table: "teams".to_string(),
            record: json!({"id": "m1", "timer_value": 3}),
        })
        .unwrap();
        tx.send(ChangeEvent::update(json!("garbage"))).unwrap();
        tx.send(ChangeEvent::update(json!({"id": "m1", "timer_value": 4}))).unwrap();

        let push = sub.next().await.unwrap();
        assert_eq!(push.timer_value, Some(4));

        drop(tx);
        assert!(sub.next().await.is_none());
    }
}
