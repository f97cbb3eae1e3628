//! Contact submission service implementing the [`ContactCommand`] port.
//!
//! One request, one pass: validate against the policy, evaluate the relay
//! gate, then either log the payload (`Queued`) or make a single bounded
//! send attempt (`Sent` or a generic internal error). No retries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::Error;
use crate::domain::contact::{ContactSubmission, MailMessage, RelaySettings, ValidationPolicy};
use crate::domain::ports::{ContactCommand, ContactOutcome, MailRelay, MailRelayError};

/// Caller-facing text for any relay failure.
pub const SEND_FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Contact service over a mail relay adapter.
#[derive(Clone)]
pub struct ContactService<R> {
    relay: Arc<R>,
    relay_settings: RelaySettings,
    policy: ValidationPolicy,
}

impl<R> ContactService<R> {
    /// Create a service from its relay adapter, relay settings and
    /// validation policy.
    pub fn new(relay: Arc<R>, relay_settings: RelaySettings, policy: ValidationPolicy) -> Self {
        Self {
            relay,
            relay_settings,
            policy,
        }
    }

    /// Active validation policy.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }
}

fn log_unsent(submission: &ContactSubmission) {
    warn!("SMTP not configured; contact payload logged instead of sending");
    info!(
        name = ?submission.name,
        email = ?submission.email,
        project = ?submission.project,
        budget = ?submission.budget,
        details = ?submission.details,
        message = ?submission.message,
        institution = ?submission.institution,
        address = ?submission.address,
        "contact submission received without relay"
    );
}

#[async_trait]
impl<R> ContactCommand for ContactService<R>
where
    R: MailRelay,
{
    async fn submit(&self, submission: ContactSubmission) -> Result<ContactOutcome, Error> {
        let validated = self.policy.validate(&submission).map_err(|err| {
            debug!(
                missing = ?err.missing(),
                missing_content = err.missing_content(),
                "contact submission failed validation"
            );
            Error::invalid_request(err.to_string())
        })?;

        // Evaluated on every request; settings are never cached as a flag.
        let Some(envelope) = self.relay_settings.envelope() else {
            log_unsent(&submission);
            return Ok(ContactOutcome::Queued);
        };

        let message = MailMessage::compose(&validated, &envelope);
        let timeout = self.relay_settings.send_timeout();
        let result = tokio::time::timeout(timeout, self.relay.send(&message))
            .await
            .unwrap_or_else(|_| Err(MailRelayError::timeout(timeout)));

        match result {
            Ok(report) if report.is_partial() => {
                warn!(
                    rejected = ?report.rejected,
                    pending = ?report.pending,
                    "email sent with rejections"
                );
                Ok(ContactOutcome::Sent)
            }
            Ok(report) => {
                info!(accepted = ?report.accepted, "email accepted by SMTP");
                Ok(ContactOutcome::Sent)
            }
            Err(err) => {
                error!(error = %err, "error sending contact email");
                Err(Error::internal(SEND_FAILURE_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
#[path = "contact_service_tests.rs"]
mod tests;
