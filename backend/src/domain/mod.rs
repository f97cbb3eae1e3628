//! Domain types, services and ports.
//!
//! Purpose: keep contact-form rules transport agnostic. Inbound adapters
//! translate HTTP into [`contact::ContactSubmission`] and call the
//! [`ports::ContactCommand`] port; outbound adapters implement
//! [`ports::MailRelay`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: domain failure with a stable category.
//! - [`TraceId`]: request-scoped correlation identifier.
//! - [`ContactService`]: the contact use-case over a relay adapter.

pub mod contact;
mod contact_service;
pub mod error;
pub mod ports;
mod trace_id;

pub use self::contact_service::{ContactService, SEND_FAILURE_MESSAGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
