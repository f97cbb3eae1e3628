//! Driven port for handing a rendered message to an outbound mail relay.
//!
//! The relay is opaque: adapters own connection handling, TLS and the wire
//! protocol. The domain only learns which recipients were accepted and
//! whether the send failed.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::contact::MailMessage;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by mail relay adapters.
    pub enum MailRelayError {
        /// The relay was never configured; nothing can be sent.
        NotConfigured => "mail relay is not configured",
        /// Connection, TLS or protocol failure.
        Transport { message: String } => "mail relay transport failed: {message}",
        /// The relay refused the message.
        Rejected { message: String } => "mail relay rejected the message: {message}",
        /// An address could not be used as a mailbox.
        InvalidAddress { message: String } => "invalid mail address: {message}",
        /// The message could not be assembled.
        Build { message: String } => "failed to build mail message: {message}",
        /// The relay did not answer in time.
        Timeout { after: Duration } => "mail relay did not respond within {after:?}",
    }
}

/// Per-recipient outcome reported by the relay after a send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReport {
    /// Recipients the relay accepted.
    pub accepted: Vec<String>,
    /// Recipients the relay refused while still taking the message.
    pub rejected: Vec<String>,
    /// Recipients whose delivery is still undecided.
    pub pending: Vec<String>,
}

impl SendReport {
    /// Report where every recipient was accepted.
    #[must_use]
    pub fn accepted(recipients: Vec<String>) -> Self {
        Self {
            accepted: recipients,
            ..Self::default()
        }
    }

    /// True when any recipient was rejected or left pending.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.rejected.is_empty() || !self.pending.is_empty()
    }
}

/// Port for delivering a composed [`MailMessage`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Send `message`, returning the relay's recipient report.
    async fn send(&self, message: &MailMessage) -> Result<SendReport, MailRelayError>;
}

/// Stand-in used when no relay credentials are present.
///
/// The contact service never calls it in that mode because the relay gate
/// stays closed; a call therefore indicates a wiring fault and fails loudly.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailRelay;

#[async_trait]
impl MailRelay for UnconfiguredMailRelay {
    async fn send(&self, _message: &MailMessage) -> Result<SendReport, MailRelayError> {
        Err(MailRelayError::not_configured())
    }
}
