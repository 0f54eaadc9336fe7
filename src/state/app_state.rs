//! Main application state management

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    CountdownState, NavMenu, PageSession, SessionLimits, SessionView, SignupError, SignupView,
    StateError, SubmitOutcome,
};
use crate::{
    catalog::{Catalog, HeroContent, Product},
    clock::Clock,
    services::SubscriptionGateway,
    tasks::CountdownTimer,
};

/// Everything the server needs to build its state
pub struct AppSettings {
    pub port: u16,
    pub host: String,
    pub drop_target: DateTime<Utc>,
    pub catalog: Catalog,
    pub hero: HeroContent,
    pub sessions: SessionLimits,
}

/// Shared state of the landing page server
pub struct AppState {
    /// Latest countdown, refreshed by the countdown timer
    countdown_tx: Arc<watch::Sender<CountdownState>>,
    countdown_rx: watch::Receiver<CountdownState>,
    countdown_timer: CountdownTimer,
    /// Open page sessions keyed by id
    sessions: Mutex<HashMap<u64, PageSession>>,
    session_limits: SessionLimits,
    next_session_id: AtomicU64,
    pub catalog: Catalog,
    pub hero: HeroContent,
    pub clock: Arc<dyn Clock>,
    pub gateway: Arc<dyn SubscriptionGateway>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create the state and start the countdown timer. Must be called from
    /// within a tokio runtime.
    pub fn new(
        settings: AppSettings,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn SubscriptionGateway>,
    ) -> Self {
        let mut initial = CountdownState::new(settings.drop_target);
        initial.recompute(clock.now());
        let (countdown_tx, countdown_rx) = watch::channel(initial);
        let countdown_tx = Arc::new(countdown_tx);
        let publish = Arc::clone(&countdown_tx);

        let countdown_timer = CountdownTimer::start(
            Arc::clone(&clock),
            settings.drop_target,
            move |countdown: &CountdownState| {
                debug!(
                    "Countdown: {}d {}h {}m {}s",
                    countdown.breakdown.days,
                    countdown.breakdown.hours,
                    countdown.breakdown.minutes,
                    countdown.breakdown.seconds
                );
                publish.send_replace(countdown.clone());
            },
        );

        Self {
            countdown_tx,
            countdown_rx,
            countdown_timer,
            sessions: Mutex::new(HashMap::new()),
            session_limits: settings.sessions,
            next_session_id: AtomicU64::new(1),
            catalog: settings.catalog,
            hero: settings.hero,
            clock,
            gateway,
            start_time: Instant::now(),
            port: settings.port,
            host: settings.host,
        }
    }

    /// Get the latest countdown
    pub fn countdown_snapshot(&self) -> CountdownState {
        self.countdown_rx.borrow().clone()
    }

    /// Receiver notified on every countdown tick
    pub fn subscribe_countdown(&self) -> watch::Receiver<CountdownState> {
        self.countdown_rx.clone()
    }

    /// Point the countdown at a new drop. The snapshot reflects the new
    /// target straight away; the timer keeps it fresh from then on.
    pub fn retarget_countdown(&self, target: DateTime<Utc>) {
        let now = self.clock.now();
        self.countdown_tx.send_modify(|countdown| {
            countdown.retarget(target);
            countdown.recompute(now);
        });
        self.countdown_timer.retarget(target);
    }

    /// Target the timer is currently counting towards
    pub fn countdown_target(&self) -> DateTime<Utc> {
        self.countdown_timer.target()
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<u64, PageSession>>, StateError> {
        self.sessions
            .lock()
            .map_err(|_| StateError::LockPoisoned("session registry"))
    }

    /// Run `f` against a session while holding the registry lock. An
    /// expired session is dropped and reported as not found.
    fn with_session<T, F>(&self, id: u64, f: F) -> Result<T, StateError>
    where
        F: FnOnce(&mut PageSession) -> Result<T, StateError>,
    {
        let now = self.clock.now();
        let mut sessions = self.lock_sessions()?;
        let expired = sessions
            .get(&id)
            .ok_or(StateError::SessionNotFound(id))?
            .is_expired(now, self.session_limits.ttl);
        if expired {
            sessions.remove(&id);
            info!("Session {} expired", id);
            return Err(StateError::SessionNotFound(id));
        }

        let session = sessions.get_mut(&id).ok_or(StateError::SessionNotFound(id))?;
        session.last_active = now;
        f(session)
    }

    /// Drop expired sessions, then the least recently used ones until there
    /// is room for one more
    fn evict_sessions(&self, sessions: &mut HashMap<u64, PageSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.session_limits.ttl));
        if sessions.len() < before {
            info!("Evicted {} expired sessions", before - sessions.len());
        }

        let capacity = self.session_limits.max_sessions.max(1);
        while sessions.len() >= capacity {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|session| (session.last_active, session.id))
                .map(|session| session.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!("Session registry full, evicted session {}", oldest);
        }
    }

    /// Open a new page session
    pub fn create_session(&self) -> Result<SessionView, StateError> {
        let now = self.clock.now();
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let session = PageSession::new(id, now);
        let view = session.view();

        let mut sessions = self.lock_sessions()?;
        self.evict_sessions(&mut sessions, now);
        sessions.insert(id, session);
        info!("Session {} opened", id);
        Ok(view)
    }

    /// Get a session snapshot
    pub fn session(&self, id: u64) -> Result<SessionView, StateError> {
        self.with_session(id, |session| Ok(session.view()))
    }

    /// Close a session. Any in-flight submission for it is discarded.
    pub fn close_session(&self, id: u64) -> Result<(), StateError> {
        self.lock_sessions()?
            .remove(&id)
            .map(|_| info!("Session {} closed", id))
            .ok_or(StateError::SessionNotFound(id))
    }

    /// Number of sessions that have not yet expired
    pub fn session_count(&self) -> usize {
        let now = self.clock.now();
        self.lock_sessions()
            .map(|sessions| {
                sessions
                    .values()
                    .filter(|session| !session.is_expired(now, self.session_limits.ttl))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Apply an edit of the email field
    pub fn edit_email(&self, id: u64, value: String) -> Result<SignupView, StateError> {
        self.with_session(id, |session| {
            session.signup.text_changed(value)?;
            Ok(session.signup.view())
        })
    }

    /// Apply the submit event. A `Started` outcome means the caller must run
    /// the submission and report back through [`AppState::complete_signup`].
    pub fn submit_signup(&self, id: u64) -> Result<(SignupView, SubmitOutcome), StateError> {
        self.with_session(id, |session| {
            let outcome = session.signup.submit()?;
            match &outcome {
                SubmitOutcome::Rejected(reason) => {
                    info!("Session {} signup rejected: {}", id, reason)
                }
                SubmitOutcome::Started(pending) => {
                    info!("Session {} submitting {}", id, pending.email)
                }
            }
            Ok((session.signup.view(), outcome))
        })
    }

    /// Record the result of a finished submission
    pub fn complete_signup(
        &self,
        id: u64,
        result: Result<(), SignupError>,
    ) -> Result<SignupView, StateError> {
        self.with_session(id, |session| {
            if let Err(e) = &result {
                warn!("Session {} submission failed: {}", id, e);
            }
            session.signup.complete(result)?;
            info!("Session {} signup is now {:?}", id, session.signup.status());
            Ok(session.signup.view())
        })
    }

    /// Toggle the floating navigation, returning the new menu state
    pub fn toggle_nav(&self, id: u64) -> Result<NavMenu, StateError> {
        self.with_session(id, |session| {
            session.nav.toggle();
            Ok(session.nav)
        })
    }

    /// Open the detail dialog for a product
    pub fn open_product(&self, id: u64, product_id: &str) -> Result<Product, StateError> {
        let product = self
            .catalog
            .find(product_id)
            .cloned()
            .ok_or_else(|| StateError::ProductNotFound(product_id.to_string()))?;

        self.with_session(id, |session| {
            session.dialog.open(product.id.clone());
            Ok(())
        })?;
        Ok(product)
    }

    /// Close the detail dialog
    pub fn close_dialog(&self, id: u64) -> Result<SessionView, StateError> {
        self.with_session(id, |session| {
            session.dialog.close();
            Ok(session.view())
        })
    }

    /// Product shown in a session's open dialog, if any
    pub fn dialog_product(&self, id: u64) -> Result<Option<Product>, StateError> {
        self.with_session(id, |session| {
            if !session.dialog.is_open() {
                return Ok(None);
            }
            Ok(session
                .dialog
                .selected()
                .and_then(|product_id| self.catalog.find(product_id))
                .cloned())
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
