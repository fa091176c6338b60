//! Backing store boundary
//!
//! The match rows and their realtime change feed live in an external backend.
//! This module defines the boundary the viewer depends on, the validated types
//! that cross it, and an in-memory implementation fed by the backend's change
//! notifications.

pub mod change;
pub mod memory;
pub mod row;

use thiserror::Error;

// Re-export main types
pub use change::{ChangeEvent, ChangeKind, ChangeSubscription, TimerPush, MATCHES_TABLE};
pub use memory::InMemoryStore;
pub use row::MatchTimerRow;

/// Errors raised at the store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid change record: {0}")]
    InvalidRecord(String),
    #[error("changes for table '{0}' are not tracked")]
    UnknownTable(String),
    #[error("failed to lock store rows")]
    LockPoisoned,
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid row JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and subscribe access to match timer rows
pub trait MatchStore: Send + Sync {
    /// Read the row for one match. `Ok(None)` when no such match exists.
    fn fetch_row(&self, match_id: &str) -> Result<Option<MatchTimerRow>, StoreError>;

    /// Subscribe to `UPDATE` notifications for one match row.
    /// Dropping the subscription unsubscribes.
    fn subscribe(&self, match_id: &str) -> Result<ChangeSubscription, StoreError>;

    /// Apply a change notification delivered by the backend and fan it out
    /// to subscribers.
    fn ingest(&self, event: ChangeEvent) -> Result<TimerPush, StoreError>;

    /// Number of live subscriptions
    fn subscriber_count(&self) -> usize;
}
