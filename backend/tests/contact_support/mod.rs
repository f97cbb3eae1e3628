//! Shared fixtures for the HTTP behaviour tests.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use async_trait::async_trait;
use contact_backend::domain::ContactService;
use contact_backend::domain::contact::{MailMessage, RelaySettings, ValidationPolicy};
use contact_backend::domain::ports::{MailRelay, MailRelayError, SendReport};
use contact_backend::inbound::http::health::HealthState;
use contact_backend::inbound::http::state::HttpState;
use contact_backend::middleware::origin::OriginPolicy;
use contact_backend::server::{AppDependencies, build_app};

/// Relay password used by the fixtures; responses must never contain it.
pub const RELAY_PASSWORD: &str = "s3cr3t-relay-password";

/// Scripted relay that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingMailRelay {
    sent: Mutex<Vec<MailMessage>>,
    failure: Option<String>,
}

impl RecordingMailRelay {
    /// Relay that accepts every message.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Relay that fails every send with a transport error quoting `detail`.
    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_owned()),
            ..Self::default()
        }
    }

    /// Messages handed to the relay so far.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("relay lock").clone()
    }
}

#[async_trait]
impl MailRelay for RecordingMailRelay {
    async fn send(&self, message: &MailMessage) -> Result<SendReport, MailRelayError> {
        self.sent.lock().expect("relay lock").push(message.clone());
        match &self.failure {
            Some(detail) => Err(MailRelayError::transport(detail.clone())),
            None => Ok(SendReport::accepted(message.to.clone())),
        }
    }
}

/// Relay settings that pass the configuration gate.
pub fn configured_settings() -> RelaySettings {
    RelaySettings {
        host: Some("smtp.example.com".into()),
        port: Some(587),
        user: Some("relay@example.com".into()),
        password: Some(RELAY_PASSWORD.into()),
        to: vec!["inbox@example.com".into()],
        ..RelaySettings::default()
    }
}

/// Initialise the full application around `relay`.
pub async fn init_app(
    relay: Arc<RecordingMailRelay>,
    relay_settings: RelaySettings,
    origin_policy: OriginPolicy,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
    let policy = ValidationPolicy::default();
    let body_rejection = policy.requirement();
    let contact = ContactService::new(relay, relay_settings, policy);
    test::init_service(build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(Arc::new(contact))),
        origin_policy,
        body_rejection,
    }))
    .await
}
