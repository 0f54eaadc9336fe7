//! Signup submission background task

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::state::{AppState, PendingSubmission};

/// Run a pending submission against the gateway and record the result on the
/// session's form. The returned handle may be awaited, aborted or ignored.
pub fn spawn_submission(
    state: Arc<AppState>,
    session_id: u64,
    pending: PendingSubmission,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Session {} submission started", session_id);
        let result = state.gateway.subscribe(&pending.email).await;

        if let Err(e) = state.complete_signup(session_id, result) {
            // Usually the session was closed while the call was in flight
            warn!("Dropping submission result for session {}: {}", session_id, e);
        }
    })
}
