//! FreeFall - A state-managed HTTP server for the FreeFall drop landing page
//!
//! This library models the interactive pieces of the landing page (the drop
//! countdown, the newsletter signup form, the lookbook dialog and the floating
//! navigation) as explicit state machines and serves them over HTTP.

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
