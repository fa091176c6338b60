//! In-memory mirror of the backend's match rows

use std::{
    collections::HashMap,
    path::Path,
    sync::Mutex,
};
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{
    ChangeEvent, ChangeKind, ChangeSubscription, MatchStore, MatchTimerRow, StoreError, TimerPush,
    MATCHES_TABLE,
};

/// Capacity of the change feed; slow subscribers skip to newer events
const FEED_CAPACITY: usize = 256;

/// Match rows kept in memory and updated from the backend's change feed
#[derive(Debug)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<String, MatchTimerRow>>,
    feed_tx: broadcast::Sender<ChangeEvent>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (feed_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            rows: Mutex::new(HashMap::new()),
            feed_tx,
        }
    }

    /// Create a store holding `rows`
    pub fn with_rows(rows: impl IntoIterator<Item = MatchTimerRow>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.rows.lock() {
            map.extend(rows.into_iter().map(|row| (row.match_id.clone(), row)));
        }
        store
    }

    /// Load rows from a JSON array file
    pub fn load_seed(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let rows: Vec<MatchTimerRow> = serde_json::from_str(&contents)?;
        info!("Seeded store with {} match rows from {}", rows.len(), path.display());
        Ok(Self::with_rows(rows))
    }

    /// Insert or replace a row without notifying subscribers
    pub fn upsert_row(&self, row: MatchTimerRow) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().map_err(|_| StoreError::LockPoisoned)?;
        rows.insert(row.match_id.clone(), row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a validated change and return the resulting row, `None` once deleted
    fn apply(&self, kind: ChangeKind, push: &TimerPush) -> Result<Option<MatchTimerRow>, StoreError> {
        let mut rows = self.rows.lock().map_err(|_| StoreError::LockPoisoned)?;

        match kind {
            ChangeKind::Delete => {
                rows.remove(&push.match_id);
                Ok(None)
            }
            ChangeKind::Insert | ChangeKind::Update => {
                let row = rows
                    .entry(push.match_id.clone())
                    .or_insert_with(|| MatchTimerRow::new(push.match_id.clone()));
                if push.timer_value.is_some() {
                    row.timer_value = push.timer_value;
                }
                if push.timer_status.is_some() {
                    row.timer_status = push.timer_status.clone();
                }
                if push.match_status.is_some() {
                    row.match_status = push.match_status.clone();
                }
                row.updated_at = Some(push.updated_at.unwrap_or_else(Utc::now));
                Ok(Some(row.clone()))
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore for InMemoryStore {
    fn fetch_row(&self, match_id: &str) -> Result<Option<MatchTimerRow>, StoreError> {
        let rows = self.rows.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.get(match_id).cloned())
    }

    fn subscribe(&self, match_id: &str) -> Result<ChangeSubscription, StoreError> {
        debug!("New change subscription for match {}", match_id);
        Ok(ChangeSubscription::new(match_id, self.feed_tx.subscribe()))
    }

    fn ingest(&self, event: ChangeEvent) -> Result<TimerPush, StoreError> {
        if event.table != MATCHES_TABLE {
            return Err(StoreError::UnknownTable(event.table));
        }

        let push = TimerPush::from_record(&event.record)?;

        // subscribers always see the full row, as the backend feed delivers it
        let (event, push) = match self.apply(event.event_type, &push)? {
            Some(row) => {
                let record = serde_json::to_value(&row)?;
                let merged = TimerPush::from_record(&record)?;
                (ChangeEvent { record, ..event }, merged)
            }
            None => (event, push),
        };

        match self.feed_tx.send(event) {
            Ok(receivers) => debug!("Change for match {} fanned out to {} subscribers", push.match_id, receivers),
            Err(_) => debug!("Change for match {} stored, no subscribers", push.match_id),
        }

        Ok(push)
    }

    fn subscriber_count(&self) -> usize {
        self.feed_tx.receiver_count()
    }
}
