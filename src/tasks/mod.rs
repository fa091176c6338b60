//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod match_viewer;

// Re-export main types
pub use match_viewer::MatchViewer;
