//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, Json,
    },
};
use chrono::Utc;
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use super::responses::{
    CatalogResponse, CountdownResponse, DialogResponse, EmailChange, HealthResponse, NavResponse,
    ProductDetail, RetargetRequest, SessionResponse, SignupResponse,
};
use crate::{
    state::{AppState, NavMenu, StateError, SubmitOutcome},
    tasks::spawn_submission,
    views::{render, LandingTemplate, COLLECTION_LABEL},
};

/// Map a state error to the HTTP status reported to the client
fn status_for(e: &StateError) -> StatusCode {
    match e {
        StateError::SessionNotFound(_) | StateError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        StateError::Transition(_) => StatusCode::CONFLICT,
        StateError::LockPoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(action: &str, e: StateError) -> StatusCode {
    let status = status_for(&e);
    if status.is_server_error() {
        error!("{} failed: {}", action, e);
    } else {
        warn!("{} rejected: {}", action, e);
    }
    status
}

/// Handle GET / - Landing page in its initial state
pub async fn landing_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, StatusCode> {
    render(LandingTemplate::new(&state, None, None))
}

/// Handle GET /sessions/:id/page - Landing page rendered from a session
pub async fn session_page_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, StatusCode> {
    let session = state.session(id).map_err(|e| reject("Render session page", e))?;
    let dialog = state
        .dialog_product(id)
        .map_err(|e| reject("Render session page", e))?;

    render(LandingTemplate::new(&state, Some(&session), dialog))
}

/// Handle GET /countdown - Current breakdown
pub async fn countdown_handler(State(state): State<Arc<AppState>>) -> Json<CountdownResponse> {
    Json(CountdownResponse {
        drop_name: state.hero.drop_name.clone(),
        countdown: state.countdown_snapshot(),
        timestamp: Utc::now(),
    })
}

/// Handle GET /countdown/stream - One `tick` event per recompute
pub async fn countdown_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.subscribe_countdown();
    // Send the current value straight away, then every change after it
    rx.mark_changed();

    let events = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let countdown = rx.borrow_and_update().clone();
        let event = Event::default()
            .event("tick")
            .json_data(&countdown)
            .unwrap_or_else(|e| {
                warn!("Failed to encode countdown event: {}", e);
                Event::default().comment("encoding failed")
            });
        Some((Ok(event), rx))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle PUT /countdown/target - Restart the countdown against a new drop
pub async fn retarget_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RetargetRequest>,
) -> StatusCode {
    info!("Retargeting countdown to {}", request.target);
    state.retarget_countdown(request.target);
    StatusCode::ACCEPTED
}

/// Handle GET /products - Catalog listing
pub async fn products_handler(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        hero: state.hero.clone(),
        products: state
            .catalog
            .products()
            .iter()
            .cloned()
            .map(ProductDetail::new)
            .collect(),
    })
}

/// Handle GET /products/:id - Single product
pub async fn product_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductDetail>, StatusCode> {
    match state.catalog.find(&product_id) {
        Some(product) => Ok(Json(ProductDetail::new(product.clone()))),
        None => {
            warn!("Unknown product requested: {}", product_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Handle POST /sessions - Open a page session
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>), StatusCode> {
    let session = state.create_session().map_err(|e| reject("Create session", e))?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session,
            timestamp: Utc::now(),
        }),
    ))
}

/// Handle GET /sessions/:id - Session snapshot
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let session = state.session(id).map_err(|e| reject("Get session", e))?;
    Ok(Json(SessionResponse {
        session,
        timestamp: Utc::now(),
    }))
}

/// Handle DELETE /sessions/:id - Close a session
pub async fn close_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    state.close_session(id).map_err(|e| reject("Close session", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle PUT /sessions/:id/signup/email - Email field edited
pub async fn email_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(change): Json<EmailChange>,
) -> Result<Json<SignupResponse>, StatusCode> {
    let signup = state
        .edit_email(id, change.email)
        .map_err(|e| reject("Edit email", e))?;
    Ok(Json(SignupResponse::new(id, signup)))
}

/// Handle POST /sessions/:id/signup/submit - Submit the form
///
/// A valid address answers 202 while the submission runs in the background;
/// an invalid one answers 200 with the error status.
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<SignupResponse>), StatusCode> {
    let (signup, outcome) = state.submit_signup(id).map_err(|e| reject("Submit signup", e))?;

    let status = match outcome {
        SubmitOutcome::Rejected(_) => StatusCode::OK,
        SubmitOutcome::Started(pending) => {
            spawn_submission(Arc::clone(&state), id, pending);
            StatusCode::ACCEPTED
        }
    };
    Ok((status, Json(SignupResponse::new(id, signup))))
}

/// Handle POST /sessions/:id/nav/toggle - Open or close the floating menu
pub async fn nav_toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<NavResponse>, StatusCode> {
    let nav = state.toggle_nav(id).map_err(|e| reject("Toggle navigation", e))?;
    Ok(Json(NavResponse {
        session_id: id,
        expanded: nav.is_expanded(),
        toggle_icon: nav.toggle_icon(),
        menu: nav.is_expanded().then(NavMenu::menu),
    }))
}

/// Handle POST /sessions/:id/dialog/:product_id - Show a product's details
pub async fn open_dialog_handler(
    State(state): State<Arc<AppState>>,
    Path((id, product_id)): Path<(u64, String)>,
) -> Result<Json<DialogResponse>, StatusCode> {
    let product = state
        .open_product(id, &product_id)
        .map_err(|e| reject("Open product dialog", e))?;
    Ok(Json(DialogResponse {
        session_id: id,
        open: true,
        collection: COLLECTION_LABEL,
        product: ProductDetail::new(product),
    }))
}

/// Handle DELETE /sessions/:id/dialog - Hide the product dialog
pub async fn close_dialog_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let session = state.close_dialog(id).map_err(|e| reject("Close product dialog", e))?;
    Ok(Json(SessionResponse {
        session,
        timestamp: Utc::now(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        state.get_uptime(),
        format!("{}:{}", state.host, state.port),
        state.countdown_target(),
        state.session_count(),
    ))
}
