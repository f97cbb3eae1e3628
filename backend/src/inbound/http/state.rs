//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ContactCommand, FixtureContactCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub contact: Arc<dyn ContactCommand>,
}

impl HttpState {
    /// Construct state from the contact use-case.
    pub fn new(contact: Arc<dyn ContactCommand>) -> Self {
        Self { contact }
    }
}

impl Default for HttpState {
    /// State backed by [`FixtureContactCommand`], which queues everything.
    fn default() -> Self {
        Self::new(Arc::new(FixtureContactCommand))
    }
}
