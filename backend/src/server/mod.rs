//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::Trace;
use crate::inbound::http::contact::{form_config, json_config, submit_contact};
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::OriginGate;
use crate::middleware::origin::OriginPolicy;

/// Everything one application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub origin_policy: OriginPolicy,
    pub body_rejection: String,
}

/// Assemble the application: routes, extractor configs, the origin gate and
/// the trace middleware (outermost, so even denied requests carry a trace
/// identifier).
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        origin_policy,
        body_rejection,
    } = deps;

    let api = web::scope("/api")
        .app_data(json_config(body_rejection.clone()))
        .app_data(form_config(body_rejection))
        .service(health)
        .service(submit_contact);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(OriginGate::new(origin_policy))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `http_state`: ports used by the HTTP handlers.
/// - `config`: pre-built [`ServerConfig`] carrying the bind address and
///   origin policy.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        origin_policy,
        body_rejection,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            origin_policy: origin_policy.clone(),
            body_rejection: body_rejection.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "contact backend listening");
    health_state.mark_ready();
    Ok(server)
}
