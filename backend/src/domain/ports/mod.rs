//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod contact_command;
mod mail_relay;

#[cfg(test)]
pub use contact_command::MockContactCommand;
pub use contact_command::{ContactCommand, ContactOutcome, FixtureContactCommand};
#[cfg(test)]
pub use mail_relay::MockMailRelay;
pub use mail_relay::{MailRelay, MailRelayError, SendReport, UnconfiguredMailRelay};
