//! Countdown timer background task

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle, time::interval};
use tracing::{debug, info};

use crate::{clock::Clock, state::CountdownState};

/// Refresh cadence of the countdown
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to the running countdown task.
///
/// The task lives exactly as long as this handle: dropping it (or calling
/// [`CountdownTimer::stop`]) aborts the task, so no tick can run afterwards.
#[derive(Debug)]
pub struct CountdownTimer {
    task: JoinHandle<()>,
    target_tx: watch::Sender<DateTime<Utc>>,
}

impl CountdownTimer {
    /// Spawn the countdown. The first tick fires immediately, then once per
    /// [`TICK_INTERVAL`]. `on_tick` receives the state after every recompute.
    pub fn start<F>(clock: Arc<dyn Clock>, target: DateTime<Utc>, on_tick: F) -> Self
    where
        F: FnMut(&CountdownState) + Send + 'static,
    {
        let (target_tx, target_rx) = watch::channel(target);
        let task = tokio::spawn(countdown_task(clock, target_rx, on_tick));
        info!("Countdown timer started, target {}", target);

        Self { task, target_tx }
    }

    /// Restart the countdown against a new target
    pub fn retarget(&self, target: DateTime<Utc>) {
        info!("Countdown retargeted to {}", target);
        self.target_tx.send_replace(target);
    }

    pub fn target(&self) -> DateTime<Utc> {
        *self.target_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the task now
    pub fn stop(self) {
        // Drop does the work
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        debug!("Countdown timer released");
        self.task.abort();
    }
}

async fn countdown_task<F>(
    clock: Arc<dyn Clock>,
    mut target_rx: watch::Receiver<DateTime<Utc>>,
    mut on_tick: F,
) where
    F: FnMut(&CountdownState) + Send + 'static,
{
    let mut state = CountdownState::new(*target_rx.borrow_and_update());
    let mut ticker = interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            // A pending retarget wins so a stale target is never published
            biased;

            changed = target_rx.changed() => {
                if changed.is_err() {
                    // Handle dropped; nothing left to publish to
                    break;
                }
                state.retarget(*target_rx.borrow_and_update());
                // A fresh interval fires immediately, recomputing against the new target
                ticker = interval(TICK_INTERVAL);
            }

            _ = ticker.tick() => {
                let refreshed = state.recompute(clock.now());
                if !refreshed {
                    debug!("Countdown target reached, breakdown frozen");
                }
                on_tick(&state);
            }
        }
    }
}
