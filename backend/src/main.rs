//! Backend entry-point: loads settings, selects the relay mode and serves
//! the contact API.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contact_backend::domain::ContactService;
use contact_backend::domain::contact::{RelaySettings, ValidationPolicy};
use contact_backend::domain::ports::{ContactCommand, UnconfiguredMailRelay};
use contact_backend::inbound::http::health::HealthState;
use contact_backend::inbound::http::state::HttpState;
use contact_backend::outbound::SmtpMailRelay;
use contact_backend::server::{ServerConfig, create_server};
use contact_backend::settings::AppSettings;

/// Pick the relay adapter. Without complete SMTP settings submissions are
/// logged and answered as queued.
fn build_contact_service(
    relay_settings: RelaySettings,
    policy: ValidationPolicy,
) -> Result<Arc<dyn ContactCommand>> {
    if relay_settings.is_configured() {
        let relay = SmtpMailRelay::from_settings(&relay_settings)
            .wrap_err("failed to configure SMTP relay")?;
        info!(
            host = relay_settings.host.as_deref().unwrap_or_default(),
            port = relay_settings.port.unwrap_or_default(),
            secure = relay_settings.secure,
            "SMTP relay configured"
        );
        Ok(Arc::new(ContactService::new(
            Arc::new(relay),
            relay_settings,
            policy,
        )))
    } else {
        warn!("SMTP relay not configured; contact submissions will be logged only");
        Ok(Arc::new(ContactService::new(
            Arc::new(UnconfiguredMailRelay),
            relay_settings,
            policy,
        )))
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let policy = settings.validation_policy()?;
    info!(requirement = %policy.requirement(), "validation policy loaded");

    let config = ServerConfig::new(bind_addr, settings.origin_policy())
        .with_validation_policy(&policy);
    let contact = build_contact_service(settings.relay_settings(), policy)?;

    let health_state = web::Data::new(HealthState::new());
    let http_state = web::Data::new(HttpState::new(contact));
    let server = create_server(health_state, http_state, config)?;
    server.await?;
    Ok(())
}
