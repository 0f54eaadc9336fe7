//! External service module
//!
//! This module contains the collaborators the landing page talks to, such as
//! the newsletter subscription endpoint.

pub mod subscription;

// Re-export main items
pub use subscription::{SimulatedGateway, SubscriptionGateway, DEFAULT_SUBMIT_DELAY};
