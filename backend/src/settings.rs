//! Process configuration loaded once at startup via OrthoConfig.
//!
//! Every value can come from a CLI flag, the environment (unprefixed, e.g.
//! `SMTP_HOST`) or a config file. Blank values count as unset. List settings
//! accept a comma-separated value, a repeated flag or a file array. Handlers
//! never read the environment; they receive the policies and relay settings
//! built here.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::contact::{
    ContactField, RelaySettings, UnknownContactField, ValidationPolicy, parse_field_list,
};
use crate::middleware::origin::OriginPolicy;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Startup configuration errors. Each aborts startup.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A policy field list names a field the form does not carry.
    #[error("{setting} lists an unknown field: {source}")]
    UnknownField {
        /// Setting that carried the bad entry.
        setting: &'static str,
        /// Underlying parse failure.
        #[source]
        source: UnknownContactField,
    },
    /// `BIND_ADDRESS` is not an IP address.
    #[error("BIND_ADDRESS {value:?} is not an IP address: {source}")]
    InvalidBindAddress {
        /// Raw configured value.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: AddrParseError,
    },
}

/// Application settings.
#[derive(Clone, Deserialize, OrthoConfig)]
pub struct AppSettings {
    /// HTTP listen port. Defaults to 4000.
    #[ortho_config(cli_short = 'p')]
    pub port: Option<u16>,
    /// Interface to bind. Defaults to all interfaces.
    #[ortho_config(cli_short = 'b')]
    pub bind_address: Option<String>,
    /// Extra allowed browser origins.
    #[ortho_config(cli_short = 'f')]
    #[serde(default)]
    pub frontend_origin: Vec<String>,
    /// Allow any `localhost` / `127.0.0.1` origin on any port.
    #[ortho_config(default = false, cli_short = 'l')]
    pub allow_localhost_origins: bool,
    /// SMTP relay host.
    #[ortho_config(cli_short = 'H')]
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[ortho_config(cli_short = 'P')]
    pub smtp_port: Option<u16>,
    /// SMTP login.
    #[ortho_config(cli_short = 'u')]
    pub smtp_user: Option<String>,
    /// SMTP password.
    #[ortho_config(cli_short = 'w')]
    pub smtp_pass: Option<String>,
    /// Use implicit TLS instead of opportunistic STARTTLS.
    #[ortho_config(default = false, cli_short = 's')]
    pub smtp_secure: bool,
    /// Bound on one send attempt, in seconds. Defaults to 5.
    #[ortho_config(cli_short = 't')]
    pub smtp_timeout_secs: Option<u64>,
    /// Sender address; falls back to `SMTP_USER`.
    #[ortho_config(cli_short = 'F')]
    pub contact_from: Option<String>,
    /// Sender display name; falls back to the submitter's name.
    #[ortho_config(cli_short = 'n')]
    pub contact_from_name: Option<String>,
    /// Recipient addresses.
    #[ortho_config(cli_short = 'T')]
    #[serde(default)]
    pub contact_to: Vec<String>,
    /// Subject prefix placed before the submitter's name.
    #[ortho_config(cli_short = 'j')]
    pub contact_subject_prefix: Option<String>,
    /// Fields that must be present besides name and email.
    #[ortho_config(cli_short = 'r')]
    #[serde(default)]
    pub contact_required_fields: Vec<String>,
    /// Fields of which at least one must be present.
    #[ortho_config(cli_short = 'c')]
    #[serde(default)]
    pub contact_content_fields: Vec<String>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("port", &self.port)
            .field("bind_address", &self.bind_address)
            .field("frontend_origin", &self.frontend_origin)
            .field("allow_localhost_origins", &self.allow_localhost_origins)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "<redacted>"))
            .field("smtp_secure", &self.smtp_secure)
            .field("smtp_timeout_secs", &self.smtp_timeout_secs)
            .field("contact_from", &self.contact_from)
            .field("contact_from_name", &self.contact_from_name)
            .field("contact_to", &self.contact_to)
            .field("contact_subject_prefix", &self.contact_subject_prefix)
            .field("contact_required_fields", &self.contact_required_fields)
            .field("contact_content_fields", &self.contact_content_fields)
            .finish()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Non-blank entries of a list setting. An entry given as one flag may still
/// carry commas.
fn entries(list: &[String]) -> impl Iterator<Item = &str> {
    list.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn field_list(
    list: &[String],
    setting: &'static str,
) -> Result<Option<Vec<ContactField>>, SettingsError> {
    let fields = parse_field_list(list)
        .map_err(|source| SettingsError::UnknownField { setting, source })?;
    Ok((!fields.is_empty()).then_some(fields))
}

impl AppSettings {
    /// Listen port, falling back to 4000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddress`] when `BIND_ADDRESS` is
    /// not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = present(self.bind_address.as_ref()).unwrap_or(DEFAULT_BIND_ADDRESS);
        let ip = raw
            .parse::<IpAddr>()
            .map_err(|source| SettingsError::InvalidBindAddress {
                value: raw.to_owned(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Origin policy: the built-in list plus `FRONTEND_ORIGIN`.
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::new(entries(&self.frontend_origin), self.allow_localhost_origins)
    }

    /// Validation policy from `CONTACT_REQUIRED_FIELDS` and
    /// `CONTACT_CONTENT_FIELDS`. Unset lists keep the inquiry form defaults.
    ///
    /// # Errors
    /// Returns [`SettingsError::UnknownField`] when a list names a field the
    /// form does not carry.
    pub fn validation_policy(&self) -> Result<ValidationPolicy, SettingsError> {
        let defaults = ValidationPolicy::default();
        let required = field_list(&self.contact_required_fields, "CONTACT_REQUIRED_FIELDS")?
            .unwrap_or_else(|| defaults.required().to_vec());
        let any_of = field_list(&self.contact_content_fields, "CONTACT_CONTENT_FIELDS")?
            .unwrap_or_else(|| defaults.any_of().to_vec());
        Ok(ValidationPolicy::new(required, any_of))
    }

    /// Relay settings handed to the contact service and the SMTP adapter.
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            user: self.smtp_user.clone(),
            password: self.smtp_pass.clone(),
            secure: self.smtp_secure,
            from: self.contact_from.clone(),
            from_name: self.contact_from_name.clone(),
            to: entries(&self.contact_to).map(str::to_owned).collect(),
            subject_prefix: self.contact_subject_prefix.clone(),
            timeout: self.smtp_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading and conversions.

    use super::*;
    use std::ffi::OsString;
    use std::net::Ipv4Addr;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 16] = [
        "PORT",
        "BIND_ADDRESS",
        "FRONTEND_ORIGIN",
        "ALLOW_LOCALHOST_ORIGINS",
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USER",
        "SMTP_PASS",
        "SMTP_SECURE",
        "SMTP_TIMEOUT_SECS",
        "CONTACT_FROM",
        "CONTACT_FROM_NAME",
        "CONTACT_TO",
        "CONTACT_SUBJECT_PREFIX",
        "CONTACT_REQUIRED_FIELDS",
        "CONTACT_CONTENT_FIELDS",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("contact-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(settings.port(), 4000);
        assert_eq!(
            settings.bind_addr().expect("default bind address"),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 4000)
        );
        assert!(!settings.allow_localhost_origins);
        assert!(!settings.relay_settings().is_configured());
        assert_eq!(
            settings.validation_policy().expect("default policy"),
            ValidationPolicy::default()
        );
    }

    #[rstest]
    #[case::single("inbox@example.com", &["inbox@example.com"])]
    #[case::comma_list(
        "inbox@example.com, sales@example.com",
        &["inbox@example.com", "sales@example.com"]
    )]
    fn environment_configures_the_relay(#[case] contact_to: &str, #[case] expected: &[&str]) {
        let _guard = lock_env(env_with(&[
            ("PORT", "8080"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USER", "relay@example.com"),
            ("SMTP_PASS", "secret"),
            ("SMTP_SECURE", "true"),
            ("SMTP_TIMEOUT_SECS", "3"),
            ("CONTACT_TO", contact_to),
        ]));

        let settings = load_from_empty_args();
        let relay = settings.relay_settings();

        assert_eq!(settings.port(), 8080);
        assert!(relay.is_configured());
        assert!(relay.secure);
        assert_eq!(relay.send_timeout(), Duration::from_secs(3));
        let envelope = relay.envelope().expect("configured envelope");
        assert_eq!(envelope.from_address, "relay@example.com");
        assert_eq!(envelope.to, expected);
    }

    #[rstest]
    fn policy_lists_are_parsed() {
        let _guard = lock_env(env_with(&[
            ("CONTACT_REQUIRED_FIELDS", "name,email,message"),
            ("CONTACT_CONTENT_FIELDS", " "),
        ]));

        let policy = load_from_empty_args()
            .validation_policy()
            .expect("policy parses");

        assert_eq!(
            policy.required(),
            [ContactField::Name, ContactField::Email, ContactField::Message]
        );
        assert_eq!(policy.requirement(), "name, email, and message are required");
        assert_eq!(policy.any_of(), ValidationPolicy::default().any_of());
    }

    #[rstest]
    fn content_fields_accept_a_comma_list() {
        let _guard = lock_env(env_with(&[("CONTACT_CONTENT_FIELDS", "project, budget")]));

        let policy = load_from_empty_args()
            .validation_policy()
            .expect("policy parses");

        assert_eq!(policy.any_of(), [ContactField::Project, ContactField::Budget]);
    }

    #[rstest]
    fn unknown_policy_field_is_rejected() {
        let _guard = lock_env(env_with(&[("CONTACT_CONTENT_FIELDS", "message,phone")]));

        let err = load_from_empty_args()
            .validation_policy()
            .expect_err("unknown field");

        assert!(matches!(
            err,
            SettingsError::UnknownField {
                setting: "CONTACT_CONTENT_FIELDS",
                ..
            }
        ));
    }

    #[rstest]
    fn bad_bind_address_is_rejected() {
        let _guard = lock_env(env_with(&[("BIND_ADDRESS", "not-an-ip")]));

        let err = load_from_empty_args().bind_addr().expect_err("bad address");

        assert!(matches!(err, SettingsError::InvalidBindAddress { .. }));
    }

    #[rstest]
    #[case::single("https://app.example/", &["https://app.example"])]
    #[case::comma_list(
        "https://app.example, https://admin.example/",
        &["https://app.example", "https://admin.example"]
    )]
    fn frontend_origin_extends_the_defaults(#[case] raw: &str, #[case] expected: &[&str]) {
        let _guard = lock_env(env_with(&[("FRONTEND_ORIGIN", raw)]));

        let policy = load_from_empty_args().origin_policy();

        for origin in expected {
            assert!(policy.allows(origin), "{origin} should be allowed");
        }
        assert!(policy.allows("https://serpvidya.app"));
        assert!(!policy.allows("https://evil.example"));
    }

    #[rstest]
    fn password_is_redacted_in_debug_output() {
        let _guard = lock_env(env_with(&[("SMTP_PASS", "hunter2")]));

        let rendered = format!("{:?}", load_from_empty_args());

        assert!(!rendered.contains("hunter2"));
    }
}
