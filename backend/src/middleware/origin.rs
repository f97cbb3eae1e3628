//! Origin gate: cross-origin request policy applied to every route.
//!
//! Requests without an `Origin` header (curl, server-to-server, same-origin
//! navigations) always pass. Browser requests pass when their origin is on the
//! allow-list, or is a localhost origin and the policy allows those. Anything
//! else is answered with `403` before the handler runs; the body never hints
//! at which origins would have been accepted.
//!
//! Preflights (`OPTIONS` carrying `Access-Control-Request-Method`) that pass
//! the gate are answered directly with `204` and the preflight headers. Any
//! other `OPTIONS` request is routed like the rest.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_METHOD, HeaderMap,
    HeaderValue, ORIGIN, VARY,
};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;
use url::Url;

use crate::domain;

/// Origins accepted by every deployment in addition to configured ones.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 6] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "https://serpvidya.app",
    "https://delicate-lebkuchen-3924c3.netlify.app",
    "https://onesolutions.tech",
    "https://www.onesolutions.tech",
];

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE_SECS: &str = "600";
const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Strip surrounding whitespace and trailing slashes from an origin.
///
/// # Examples
/// ```
/// use contact_backend::middleware::origin::normalize_origin;
///
/// assert_eq!(normalize_origin(" https://serpvidya.app// "), "https://serpvidya.app");
/// ```
#[must_use]
pub fn normalize_origin(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

/// Explicit allow-list plus a switch for any localhost origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
    allow_localhost: bool,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), false)
    }
}

impl OriginPolicy {
    /// Build a policy from configured origins; the defaults are always
    /// included and every entry is normalised.
    pub fn new<I, S>(configured: I, allow_localhost: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self {
            allowed: Vec::new(),
            allow_localhost,
        };
        for origin in configured {
            policy.push(origin.as_ref());
        }
        for origin in DEFAULT_ALLOWED_ORIGINS {
            policy.push(origin);
        }
        policy
    }

    fn push(&mut self, origin: &str) {
        let origin = normalize_origin(origin);
        if !origin.is_empty() && !self.allowed.iter().any(|known| known == origin) {
            self.allowed.push(origin.to_owned());
        }
    }

    /// Build a policy from a comma-separated origin list such as the
    /// `FRONTEND_ORIGIN` setting.
    ///
    /// # Examples
    /// ```
    /// use contact_backend::middleware::origin::OriginPolicy;
    ///
    /// let policy = OriginPolicy::from_list(Some("https://app.example/, ,"), false);
    /// assert!(policy.allows("https://app.example"));
    /// assert!(policy.allows("http://localhost:5173"));
    /// assert!(!policy.allows("http://evil.example"));
    /// ```
    #[must_use]
    pub fn from_list(raw: Option<&str>, allow_localhost: bool) -> Self {
        Self::new(raw.unwrap_or_default().split(','), allow_localhost)
    }

    /// Normalised allow-list, configured entries first.
    #[must_use]
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    /// Whether any localhost origin is accepted.
    #[must_use]
    pub fn allows_localhost(&self) -> bool {
        self.allow_localhost
    }

    /// Decide whether `origin` may call the API.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        let origin = normalize_origin(origin);
        if origin.is_empty() {
            return false;
        }
        self.allowed.iter().any(|known| known == origin)
            || (self.allow_localhost && is_localhost_origin(origin))
    }
}

fn is_localhost_origin(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| LOCAL_HOSTS.contains(&host))
        && url.username().is_empty()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
}

enum OriginDecision {
    Absent,
    Allowed(HeaderValue),
    Denied,
}

fn decide(policy: &OriginPolicy, headers: &HeaderMap) -> OriginDecision {
    let mut values = headers.get_all(ORIGIN);
    let Some(first) = values.next() else {
        return OriginDecision::Absent;
    };
    if values.next().is_some() {
        warn!("Blocked by CORS: multiple Origin headers");
        return OriginDecision::Denied;
    }
    let Ok(origin) = first.to_str() else {
        warn!("Blocked by CORS: Origin header is not valid text");
        return OriginDecision::Denied;
    };
    if policy.allows(origin) {
        OriginDecision::Allowed(first.clone())
    } else {
        warn!(origin, "Blocked by CORS");
        OriginDecision::Denied
    }
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
}

fn preflight_response(origin: Option<HeaderValue>) -> HttpResponse {
    let mut response = HttpResponse::NoContent()
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .insert_header((ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE_SECS))
        .finish();
    if let Some(origin) = origin {
        apply_cors_headers(response.headers_mut(), origin);
    }
    response
}

fn is_preflight(req: &ServiceRequest) -> bool {
    *req.method() == Method::OPTIONS
        && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

fn denied_response() -> HttpResponse {
    domain::Error::forbidden("Origin not allowed").error_response()
}

/// Middleware enforcing an [`OriginPolicy`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use contact_backend::middleware::{OriginGate, origin::OriginPolicy};
///
/// let app = App::new().wrap(OriginGate::new(OriginPolicy::default()));
/// ```
#[derive(Clone)]
pub struct OriginGate {
    policy: Arc<OriginPolicy>,
}

impl OriginGate {
    /// Wrap `policy` for use with `App::wrap`.
    #[must_use]
    pub fn new(policy: OriginPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = OriginGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginGateMiddleware {
            service,
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`OriginGate`].
pub struct OriginGateMiddleware<S> {
    service: S,
    policy: Arc<OriginPolicy>,
}

impl<S, B> Service<ServiceRequest> for OriginGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let origin = match decide(&self.policy, req.headers()) {
            OriginDecision::Denied => {
                let res = req.into_response(denied_response()).map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
            OriginDecision::Absent => None,
            OriginDecision::Allowed(origin) => Some(origin),
        };

        if is_preflight(&req) {
            let res = req
                .into_response(preflight_response(origin))
                .map_into_right_body();
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(origin) = origin {
                apply_cors_headers(res.headers_mut(), origin);
            }
            Ok(res.map_into_left_body())
        })
    }
}
