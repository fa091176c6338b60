//! State management module
//!
//! This module contains the per-match viewer state and the application-wide
//! registry of mounted viewers.

pub mod app_state;
pub mod viewer_state;

use thiserror::Error;

use crate::store::StoreError;

// Re-export main types
pub use app_state::AppState;
pub use viewer_state::ViewerState;

/// Errors raised while managing viewers
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no viewer mounted for match {0}")]
    NotMounted(String),
    #[error("failed to subscribe to match changes: {0}")]
    Subscribe(#[from] StoreError),
    #[error("failed to lock viewer registry")]
    LockPoisoned,
}
