//! Timer reconciliation module
//!
//! Pure, clock-injected pieces of the live match timer: the status enum, the
//! authoritative snapshot, the projection from snapshot to display time, and
//! the rendered display.

pub mod clock;
pub mod display;
pub mod projection;
pub mod snapshot;
pub mod status;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use display::MatchClockDisplay;
pub use projection::{display_time, elapsed_since_snapshot};
pub use snapshot::TimerSnapshot;
pub use status::TimerStatus;
