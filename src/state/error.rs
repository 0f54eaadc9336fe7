//! Errors raised by application state operations

use thiserror::Error;

use super::TransitionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),

    #[error("session {0} not found")]
    SessionNotFound(u64),

    #[error("product {0} not found")]
    ProductNotFound(String),

    #[error("illegal signup transition: {0}")]
    Transition(#[from] TransitionError),
}
