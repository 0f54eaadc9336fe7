//! Server-rendered landing page

use askama::Template;
use axum::{http::StatusCode, response::Html};
use chrono::{Datelike, SecondsFormat};
use tracing::error;

use crate::{
    api::responses::ProductDetail,
    catalog::{HeroContent, Product},
    state::{
        AppState, NavMenu, NavMenuContent, SessionView, SignupForm, SignupStatus, SignupView,
    },
};

/// Collection name shown in the product dialog
pub const COLLECTION_LABEL: &str = "FIGURE OF ART: BLACK GOLD COLLECTION";

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate<'a> {
    pub hero: &'a HeroContent,
    pub units: [(u64, &'static str); 4],
    pub target: String,
    pub products: &'a [Product],
    pub dialog: Option<ProductDetail>,
    pub collection: &'static str,
    pub nav_expanded: bool,
    pub toggle_icon: &'static str,
    pub menu: &'static NavMenuContent,
    pub signup: SignupView,
    pub signup_failed: bool,
    pub session_id: Option<u64>,
    pub year: i32,
}

impl<'a> LandingTemplate<'a> {
    /// Page for `session`, or the initial page when there is none
    pub fn new(
        state: &'a AppState,
        session: Option<&SessionView>,
        dialog: Option<Product>,
    ) -> Self {
        let countdown = state.countdown_snapshot();
        let signup = match session {
            Some(session) => session.signup.clone(),
            None => SignupForm::new().view(),
        };
        let nav = session.map(|session| session.nav).unwrap_or_default();

        Self {
            hero: &state.hero,
            units: countdown.breakdown.units(),
            target: countdown.target.to_rfc3339_opts(SecondsFormat::Millis, true),
            products: state.catalog.products(),
            dialog: dialog.map(ProductDetail::new),
            collection: COLLECTION_LABEL,
            nav_expanded: nav.is_expanded(),
            toggle_icon: nav.toggle_icon(),
            menu: NavMenu::menu(),
            signup_failed: matches!(signup.status, SignupStatus::Error { .. }),
            signup,
            session_id: session.map(|session| session.id),
            year: state.clock.now().year(),
        }
    }
}

/// Render a template into an HTML response
pub fn render<T: Template>(template: T) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        error!("Template error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
