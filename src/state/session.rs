//! Per-visitor page session

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{NavMenu, ProductDialog, SignupForm, SignupView};

pub const DEFAULT_SESSION_TTL_MINS: u64 = 30;
pub const DEFAULT_MAX_SESSIONS: u64 = 10_000;

/// Bounds on the session registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Inactivity after which a session is dropped
    pub ttl: Duration,
    /// Most sessions held at once
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINS as i64),
            max_sessions: DEFAULT_MAX_SESSIONS as usize,
        }
    }
}

/// Interactive state of one visitor's landing page
#[derive(Debug, Clone)]
pub struct PageSession {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub signup: SignupForm,
    pub nav: NavMenu,
    pub dialog: ProductDialog,
}

impl PageSession {
    pub fn new(id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            last_active: created_at,
            signup: SignupForm::new(),
            nav: NavMenu::new(),
            dialog: ProductDialog::new(),
        }
    }

    /// Whether the session has sat untouched for at least `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_active) >= ttl
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            signup: self.signup.view(),
            nav: self.nav,
            dialog: self.dialog.clone(),
        }
    }
}

/// Serializable snapshot of a page session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub signup: SignupView,
    pub nav: NavMenu,
    pub dialog: ProductDialog,
}
