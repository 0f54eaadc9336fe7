//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/health", get(health_handler))
        // Drop countdown
        .route("/countdown", get(countdown_handler))
        .route("/countdown/stream", get(countdown_stream_handler))
        .route("/countdown/target", put(retarget_handler))
        // Catalog
        .route("/products", get(products_handler))
        .route("/products/:product_id", get(product_handler))
        // Page sessions
        .route("/sessions", post(create_session_handler))
        .route("/sessions/:id", get(session_handler).delete(close_session_handler))
        .route("/sessions/:id/page", get(session_page_handler))
        .route("/sessions/:id/signup/email", put(email_handler))
        .route("/sessions/:id/signup/submit", post(submit_handler))
        .route("/sessions/:id/nav/toggle", post(nav_toggle_handler))
        .route("/sessions/:id/dialog", delete(close_dialog_handler))
        .route("/sessions/:id/dialog/:product_id", post(open_dialog_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
