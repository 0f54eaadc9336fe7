//! FreeFall - A state-managed HTTP server for the FreeFall drop landing page
//!
//! This is the main entry point for the freefall application.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use freefall::{
    api::create_router,
    clock::{Clock, SystemClock},
    config::Config,
    services::SimulatedGateway,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("freefall={},tower_http=info", config.log_level()))
        .init();

    info!("Starting freefall server v{}", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings = config.settings(clock.now())?;
    info!(
        "Configuration: host={}, port={}, drop={} at {}, products={}, submit_delay={:?}",
        config.host,
        config.port,
        settings.hero.drop_name,
        settings.drop_target,
        settings.catalog.products().len(),
        config.submit_delay()
    );
    info!(
        "Sessions: idle ttl={}m, max={}",
        settings.sessions.ttl.num_minutes(),
        settings.sessions.max_sessions
    );

    // Create application state; this also starts the countdown timer
    let gateway = Arc::new(SimulatedGateway::new(config.submit_delay()));
    let state = Arc::new(AppState::new(settings, clock, gateway));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /                                - Landing page");
    info!("  GET    /countdown                       - Drop countdown");
    info!("  GET    /countdown/stream                - Countdown ticks (SSE)");
    info!("  PUT    /countdown/target                - Retarget the countdown");
    info!("  GET    /products[/:id]                  - Catalog");
    info!("  POST   /sessions                        - Open a page session");
    info!("  PUT    /sessions/:id/signup/email       - Edit signup email");
    info!("  POST   /sessions/:id/signup/submit      - Submit signup");
    info!("  POST   /sessions/:id/nav/toggle         - Toggle navigation");
    info!("  POST   /sessions/:id/dialog/:product_id - Open product dialog");
    info!("  GET    /health                          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
