//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::domain::contact::ValidationPolicy;
use crate::middleware::origin::OriginPolicy;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) origin_policy: OriginPolicy,
    pub(crate) body_rejection: String,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` and guarded by
    /// `origin_policy`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, origin_policy: OriginPolicy) -> Self {
        Self {
            bind_addr,
            origin_policy,
            body_rejection: ValidationPolicy::default().requirement(),
        }
    }

    /// Answer malformed contact bodies with the requirement sentence of
    /// `policy`, matching its validation failures.
    #[must_use]
    pub fn with_validation_policy(mut self, policy: &ValidationPolicy) -> Self {
        self.body_rejection = policy.requirement();
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the origin policy enforced by the server.
    #[must_use]
    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.origin_policy
    }
}
