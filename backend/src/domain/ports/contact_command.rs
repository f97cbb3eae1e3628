//! Driving port for contact-form submissions.
//!
//! Inbound adapters call this port with a parsed [`ContactSubmission`]; they
//! never see the relay or the validation policy. HTTP handler tests swap in
//! a fixture or mock instead of wiring a real relay.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::contact::ContactSubmission;

/// Terminal outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// No relay configured: the payload was logged for operator review and
    /// nothing else will happen to it.
    Queued,
    /// The relay accepted the message.
    Sent,
}

/// Domain use-case port for contact submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactCommand: Send + Sync {
    /// Validate and deliver (or log) a submission.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when required fields are missing.
    /// - `InternalError` when the relay fails; the message is generic.
    async fn submit(&self, submission: ContactSubmission) -> Result<ContactOutcome, Error>;
}

/// Fixture that accepts everything as queued.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactCommand;

#[async_trait]
impl ContactCommand for FixtureContactCommand {
    async fn submit(&self, _submission: ContactSubmission) -> Result<ContactOutcome, Error> {
        Ok(ContactOutcome::Queued)
    }
}
