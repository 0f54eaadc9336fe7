//! Newsletter subscription gateway

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::state::SignupError;

/// Default latency of the simulated gateway
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

/// Endpoint that registers an address for drop announcements.
///
/// Implementations must be safe for the caller to retry; the signup form
/// never retries on its own.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    async fn subscribe(&self, email: &str) -> Result<(), SignupError>;
}

/// Stand-in gateway that waits for a fixed delay and always succeeds
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubscriptionGateway for SimulatedGateway {
    async fn subscribe(&self, email: &str) -> Result<(), SignupError> {
        debug!("Simulating subscription for {} ({:?})", email, self.delay);
        sleep(self.delay).await;
        info!("Subscribed {}", email);
        Ok(())
    }
}
