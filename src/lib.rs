//! Kho Clock - Live match timer for tournament viewers
//!
//! This library keeps a locally ticking match clock in step with the
//! authoritative timer rows written by the scorer, correcting for clock skew
//! between the scorer's device and the viewer's.

pub mod config;
pub mod state;
pub mod api;
pub mod store;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
