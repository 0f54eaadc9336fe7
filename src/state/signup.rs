//! Email signup form state machine

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Why a signup ended up in the error state
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SignupError {
    #[error("Please enter a valid email address.")]
    Validation,

    #[error("Subscription failed: {0}")]
    Submission(String),
}

/// An event that is not legal in the form's current status
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("input is disabled while submitting or after subscribing")]
    InputDisabled,

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("this form has already subscribed")]
    AlreadySubscribed,

    #[error("no submission is in flight")]
    NotSubmitting,
}

/// The single status tag of a signup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignupStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error { reason: SignupError },
}

/// Check an address against `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), SignupError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(SignupError::Validation)
    }
}

/// A validated address waiting to be handed to the subscription gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub email: String,
}

/// Result of a submit event that was accepted by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the form is now in the error state
    Rejected(SignupError),
    /// The form is now submitting; the caller must run the submission
    Started(PendingSubmission),
}

/// Signup form: held email text plus exactly one status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    email: String,
    status: SignupStatus,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> &SignupStatus {
        &self.status
    }

    /// Input and submit control are disabled while submitting and after success
    pub fn input_enabled(&self) -> bool {
        !matches!(self.status, SignupStatus::Submitting | SignupStatus::Success)
    }

    /// Text of the submit control for the current status
    pub fn submit_label(&self) -> &'static str {
        match self.status {
            SignupStatus::Submitting => "SUBMITTING...",
            SignupStatus::Success => "SUBSCRIBED",
            _ => "SUBSCRIBE FOR DROPS",
        }
    }

    /// Inline message shown under the form, if any
    pub fn message(&self) -> Option<String> {
        match &self.status {
            SignupStatus::Success => Some("You're in! Watch for our next drop.".to_string()),
            SignupStatus::Error { reason } => Some(reason.to_string()),
            _ => None,
        }
    }

    /// Handle an edit of the email field
    pub fn text_changed(&mut self, value: impl Into<String>) -> Result<(), TransitionError> {
        if !self.input_enabled() {
            return Err(TransitionError::InputDisabled);
        }

        self.email = value.into();
        if matches!(self.status, SignupStatus::Error { .. }) {
            self.status = SignupStatus::Idle;
        }
        Ok(())
    }

    /// Handle the submit event
    pub fn submit(&mut self) -> Result<SubmitOutcome, TransitionError> {
        match self.status {
            SignupStatus::Submitting => return Err(TransitionError::AlreadySubmitting),
            SignupStatus::Success => return Err(TransitionError::AlreadySubscribed),
            _ => {}
        }

        if let Err(reason) = validate_email(&self.email) {
            self.status = SignupStatus::Error {
                reason: reason.clone(),
            };
            return Ok(SubmitOutcome::Rejected(reason));
        }

        self.status = SignupStatus::Submitting;
        Ok(SubmitOutcome::Started(PendingSubmission {
            email: self.email.clone(),
        }))
    }

    /// Apply the result of the in-flight submission
    pub fn complete(&mut self, result: Result<(), SignupError>) -> Result<(), TransitionError> {
        if self.status != SignupStatus::Submitting {
            return Err(TransitionError::NotSubmitting);
        }

        self.status = match result {
            Ok(()) => SignupStatus::Success,
            Err(reason) => SignupStatus::Error { reason },
        };
        Ok(())
    }

    /// Serializable snapshot including the derived UI fields
    pub fn view(&self) -> SignupView {
        SignupView {
            email: self.email.clone(),
            status: self.status.clone(),
            input_enabled: self.input_enabled(),
            submit_label: self.submit_label(),
            message: self.message(),
        }
    }
}

/// Snapshot of a signup form as rendered to clients
#[derive(Debug, Clone, Serialize)]
pub struct SignupView {
    pub email: String,
    #[serde(flatten)]
    pub status: SignupStatus,
    pub input_enabled: bool,
    pub submit_label: &'static str,
    pub message: Option<String>,
}
