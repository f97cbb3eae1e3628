//! Mail relay settings and the "is outbound mail configured" gate.

use std::fmt;
use std::time::Duration;

/// Subject prefix used when none is configured.
pub const DEFAULT_SUBJECT_PREFIX: &str = "Project Inquiry from";

/// Upper bound on a single relay send when none is configured.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound relay configuration, built once at startup.
///
/// Every connection value is optional: a deployment without relay
/// credentials is a supported mode in which submissions are logged and
/// acknowledged as queued.
#[derive(Clone, Default)]
pub struct RelaySettings {
    /// Relay host name.
    pub host: Option<String>,
    /// Relay port.
    pub port: Option<u16>,
    /// Relay username.
    pub user: Option<String>,
    /// Relay password.
    pub password: Option<String>,
    /// Use implicit TLS instead of opportunistic STARTTLS.
    pub secure: bool,
    /// Sender address; falls back to `user`.
    pub from: Option<String>,
    /// Sender display name; falls back to the submitter's name.
    pub from_name: Option<String>,
    /// Recipient addresses; blank entries are ignored.
    pub to: Vec<String>,
    /// Subject prefix placed before the submitter's name.
    pub subject_prefix: Option<String>,
    /// Bound on a single send.
    pub timeout: Option<Duration>,
}

/// Addressing derived from complete relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Sender address.
    pub from_address: String,
    /// Fixed sender display name, if configured.
    pub from_name: Option<String>,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject prefix.
    pub subject_prefix: String,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl RelaySettings {
    /// True when host, port, user, password and recipient are all set.
    ///
    /// # Examples
    /// ```
    /// use contact_backend::domain::contact::RelaySettings;
    ///
    /// let mut settings = RelaySettings::default();
    /// assert!(!settings.is_configured());
    ///
    /// settings.host = Some("smtp.example.com".into());
    /// settings.port = Some(587);
    /// settings.user = Some("relay@example.com".into());
    /// settings.password = Some("secret".into());
    /// settings.to = vec!["inbox@example.com".into()];
    /// assert!(settings.is_configured());
    /// ```
    #[must_use]
    pub fn is_configured(&self) -> bool {
        present(self.host.as_ref()).is_some()
            && self.port.is_some_and(|port| port != 0)
            && present(self.user.as_ref()).is_some()
            && present(self.password.as_ref()).is_some()
            && !self.recipients().is_empty()
    }

    /// Addressing for outgoing mail, or `None` when the relay is not
    /// configured.
    #[must_use]
    pub fn envelope(&self) -> Option<Envelope> {
        if !self.is_configured() {
            return None;
        }
        let from_address = present(self.from.as_ref()).or(present(self.user.as_ref()))?;
        Some(Envelope {
            from_address: from_address.to_owned(),
            from_name: present(self.from_name.as_ref()).map(str::to_owned),
            to: self.recipients(),
            subject_prefix: present(self.subject_prefix.as_ref())
                .unwrap_or(DEFAULT_SUBJECT_PREFIX)
                .to_owned(),
        })
    }

    /// Effective send timeout.
    #[must_use]
    pub fn send_timeout(&self) -> Duration {
        self.timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_SEND_TIMEOUT)
    }

    fn recipients(&self) -> Vec<String> {
        self.to
            .iter()
            .map(|address| address.trim())
            .filter(|address| !address.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("secure", &self.secure)
            .field("from", &self.from)
            .field("from_name", &self.from_name)
            .field("to", &self.to)
            .field("subject_prefix", &self.subject_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn configured() -> RelaySettings {
        RelaySettings {
            host: Some("smtp.example.com".into()),
            port: Some(587),
            user: Some("relay@example.com".into()),
            password: Some("hunter2".into()),
            to: vec!["inbox@example.com".into()],
            ..RelaySettings::default()
        }
    }

    #[rstest]
    fn configured_settings_open_the_gate(configured: RelaySettings) {
        let envelope = configured.envelope().expect("configured relay");
        assert_eq!(envelope.from_address, "relay@example.com");
        assert_eq!(envelope.to, vec!["inbox@example.com".to_owned()]);
        assert_eq!(envelope.subject_prefix, DEFAULT_SUBJECT_PREFIX);
        assert!(envelope.from_name.is_none());
    }

    #[rstest]
    #[case::host(|s: &mut RelaySettings| s.host = None)]
    #[case::port(|s: &mut RelaySettings| s.port = None)]
    #[case::user(|s: &mut RelaySettings| s.user = Some("  ".into()))]
    #[case::password(|s: &mut RelaySettings| s.password = None)]
    #[case::to(|s: &mut RelaySettings| s.to = vec![" ".into(), String::new()])]
    fn any_missing_value_closes_the_gate(
        mut configured: RelaySettings,
        #[case] clear: fn(&mut RelaySettings),
    ) {
        clear(&mut configured);
        assert!(!configured.is_configured());
        assert!(configured.envelope().is_none());
    }

    #[rstest]
    fn explicit_sender_and_recipients_win(mut configured: RelaySettings) {
        configured.from = Some("noreply@example.com".into());
        configured.from_name = Some("Website".into());
        configured.to = vec!["a@example.com".into(), " b@example.com ".into()];
        configured.subject_prefix = Some("School ERP inquiry from".into());

        let envelope = configured.envelope().expect("configured relay");
        assert_eq!(envelope.from_address, "noreply@example.com");
        assert_eq!(envelope.from_name.as_deref(), Some("Website"));
        assert_eq!(envelope.to, vec!["a@example.com".to_owned(), "b@example.com".to_owned()]);
        assert_eq!(envelope.subject_prefix, "School ERP inquiry from");
    }

    #[rstest]
    fn debug_output_redacts_password(configured: RelaySettings) {
        let rendered = format!("{configured:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn zero_timeout_falls_back_to_default(mut configured: RelaySettings) {
        configured.timeout = Some(Duration::ZERO);
        assert_eq!(configured.send_timeout(), DEFAULT_SEND_TIMEOUT);
    }
}
