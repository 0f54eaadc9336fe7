//! State management module
//!
//! This module contains the landing page components as explicit state
//! machines, plus the shared application state that owns them.

pub mod app_state;
pub mod countdown;
pub mod error;
pub mod lookbook;
pub mod navigation;
pub mod session;
pub mod signup;

// Re-export main types
pub use app_state::{AppSettings, AppState};
pub use countdown::{compute_breakdown, Breakdown, CountdownState, DEFAULT_DROP_DAYS};
pub use error::StateError;
pub use lookbook::{DetailAction, ProductDialog};
pub use navigation::{NavGroup, NavItem, NavMenu, NavMenuContent};
pub use session::{
    PageSession, SessionLimits, SessionView, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_MINS,
};
pub use signup::{
    validate_email, PendingSubmission, SignupError, SignupForm, SignupStatus, SignupView,
    SubmitOutcome, TransitionError,
};
