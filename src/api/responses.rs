//! API response and request structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{HeroContent, Product},
    state::{CountdownState, DetailAction, NavMenuContent, SessionView, SignupView},
};

/// Body of `PUT /countdown/target`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetargetRequest {
    pub target: DateTime<Utc>,
}

/// Body of `PUT /sessions/:id/signup/email`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailChange {
    pub email: String,
}

/// Countdown with the hero copy it is shown under
#[derive(Debug, Clone, Serialize)]
pub struct CountdownResponse {
    pub drop_name: String,
    #[serde(flatten)]
    pub countdown: CountdownState,
    pub timestamp: DateTime<Utc>,
}

/// Response to signup events
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub session_id: u64,
    pub signup: SignupView,
    pub timestamp: DateTime<Utc>,
}

impl SignupResponse {
    pub fn new(session_id: u64, signup: SignupView) -> Self {
        Self {
            session_id,
            signup,
            timestamp: Utc::now(),
        }
    }
}

/// Response to `POST /sessions/:id/nav/toggle`
#[derive(Debug, Clone, Serialize)]
pub struct NavResponse {
    pub session_id: u64,
    pub expanded: bool,
    pub toggle_icon: &'static str,
    /// Menu contents, only sent while the menu is expanded
    pub menu: Option<&'static NavMenuContent>,
}

/// A product together with its detail-dialog action
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub availability: &'static str,
    pub action: DetailAction,
}

impl ProductDetail {
    pub fn new(product: Product) -> Self {
        Self {
            availability: product.availability_label(),
            action: DetailAction::for_product(&product),
            product,
        }
    }
}

/// Response to `POST /sessions/:id/dialog/:product_id`
#[derive(Debug, Clone, Serialize)]
pub struct DialogResponse {
    pub session_id: u64,
    pub open: bool,
    pub collection: &'static str,
    pub product: ProductDetail,
}

/// Catalog listing
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub hero: HeroContent,
    pub products: Vec<ProductDetail>,
}

/// Session snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: SessionView,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub address: String,
    pub drop_target: DateTime<Utc>,
    pub sessions: usize,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(
        uptime: String,
        address: String,
        drop_target: DateTime<Utc>,
        sessions: usize,
    ) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            address,
            drop_target,
            sessions,
        }
    }
}
