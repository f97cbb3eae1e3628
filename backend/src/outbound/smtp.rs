//! Lettre-backed SMTP relay adapter.
//!
//! This adapter owns transport details only: TLS mode, authentication,
//! timeout, MIME assembly and SMTP error mapping. Rendering happens in the
//! domain; the adapter receives a finished [`MailMessage`].

use std::time::Duration;

use async_trait::async_trait;
use lettre::address::Envelope;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use crate::domain::contact::{Correspondent, MailMessage, RelaySettings};
use crate::domain::ports::{MailRelay, MailRelayError, SendReport};

/// Mail relay sending over SMTP with credentials.
///
/// `SMTP_SECURE` selects implicit TLS (usually port 465). Otherwise the
/// connection starts in plain text and upgrades with STARTTLS when the server
/// offers it.
pub struct SmtpMailRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl std::fmt::Debug for SmtpMailRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailRelay")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, MailRelayError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            debug!(setting = name, "smtp setting missing");
            MailRelayError::not_configured()
        })
}

impl SmtpMailRelay {
    /// Build a relay from settings.
    ///
    /// No connection is opened here; the first send dials the server.
    ///
    /// # Errors
    ///
    /// - [`MailRelayError::NotConfigured`] when host, port, user or password
    ///   is missing.
    /// - [`MailRelayError::Transport`] when TLS parameters cannot be built
    ///   for the host.
    pub fn from_settings(settings: &RelaySettings) -> Result<Self, MailRelayError> {
        let host = required(settings.host.as_deref(), "host")?;
        let port = settings
            .port
            .filter(|port| *port != 0)
            .ok_or_else(MailRelayError::not_configured)?;
        let user = required(settings.user.as_deref(), "user")?;
        let password = required(settings.password.as_deref(), "password")?;
        let timeout = settings.send_timeout();

        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|err| MailRelayError::transport(err.to_string()))?
        } else {
            let tls = TlsParameters::new(host.to_owned())
                .map_err(|err| MailRelayError::transport(err.to_string()))?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .tls(Tls::Opportunistic(tls))
        };

        let transport = builder
            .port(port)
            .credentials(Credentials::new(user.to_owned(), password.to_owned()))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, timeout })
    }
}

fn parse_address(raw: &str) -> Result<Address, MailRelayError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|err| MailRelayError::invalid_address(format!("{raw}: {err}")))
}

fn mailbox(correspondent: &Correspondent) -> Result<Mailbox, MailRelayError> {
    Ok(Mailbox::new(
        correspondent.display_name.clone(),
        parse_address(&correspondent.address)?,
    ))
}

/// Assemble the MIME message: `multipart/alternative` with plain text and
/// HTML bodies.
///
/// An unusable reply-to address is logged and dropped rather than failing
/// the send; the submitter's address is still in the body.
pub fn build_email(message: &MailMessage) -> Result<Message, MailRelayError> {
    let mut builder = Message::builder()
        .from(mailbox(&message.from)?)
        .subject(message.subject.as_str());

    for recipient in &message.to {
        builder = builder.to(Mailbox::new(None, parse_address(recipient)?));
    }

    match parse_address(&message.reply_to) {
        Ok(address) => builder = builder.reply_to(Mailbox::new(None, address)),
        Err(err) => warn!(error = %err, "reply-to omitted from contact email"),
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))
        .map_err(|err| MailRelayError::build(err.to_string()))
}

fn map_send_error(error: &lettre::transport::smtp::Error, timeout: Duration) -> MailRelayError {
    if error.is_timeout() {
        MailRelayError::timeout(timeout)
    } else if error.is_permanent() {
        MailRelayError::rejected(error.to_string())
    } else {
        MailRelayError::transport(error.to_string())
    }
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    async fn send(&self, message: &MailMessage) -> Result<SendReport, MailRelayError> {
        let email = build_email(message)?;
        let raw = email.formatted();
        let sender = email.envelope().from().cloned();
        let mut report = SendReport::default();
        let mut first_failure = None;

        // One transaction per recipient: lettre abandons the whole
        // transaction on the first refused RCPT.
        for recipient in email.envelope().to() {
            let envelope = Envelope::new(sender.clone(), vec![recipient.clone()])
                .map_err(|err| MailRelayError::build(err.to_string()))?;
            match self.transport.send_raw(&envelope, &raw).await {
                Ok(response) => {
                    debug!(%recipient, code = %response.code(), "smtp relay accepted recipient");
                    report.accepted.push(recipient.to_string());
                }
                Err(err) => {
                    warn!(%recipient, error = %err, "smtp relay did not accept recipient");
                    if err.is_permanent() {
                        report.rejected.push(recipient.to_string());
                    } else {
                        report.pending.push(recipient.to_string());
                    }
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) if report.accepted.is_empty() => Err(map_send_error(&err, self.timeout)),
            _ => Ok(report),
        }
    }
}
