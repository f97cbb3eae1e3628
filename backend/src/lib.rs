//! Contact-form backend library modules.
//!
//! Hexagonal layout: [`domain`] holds the submission policy, rendering and
//! ports; [`inbound`] adapts HTTP onto the driving port; [`outbound`]
//! implements the mail relay port over SMTP; [`server`] wires them together.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

pub use middleware::Trace;
