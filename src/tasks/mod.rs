//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod countdown_timer;
pub mod submission;

// Re-export main items
pub use countdown_timer::{CountdownTimer, TICK_INTERVAL};
pub use submission::spawn_submission;
