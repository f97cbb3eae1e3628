//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **smtp**: lettre-backed [`MailRelay`](crate::domain::ports::MailRelay)
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod smtp;

pub use smtp::SmtpMailRelay;
