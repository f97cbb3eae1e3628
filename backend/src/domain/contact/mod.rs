//! Contact-form domain: submissions, the required-field policy, relay
//! settings and mail rendering.
//!
//! Public surface:
//! - [`ContactSubmission`]: transient caller payload.
//! - [`ValidationPolicy`]: which fields must be present.
//! - [`RelaySettings`] / [`Envelope`]: relay configuration and the
//!   "is outbound mail configured" gate.
//! - [`MailMessage`]: the rendered message handed to the relay port.

mod field;
mod message;
mod policy;
mod relay;
mod submission;

pub use field::{ContactField, UnknownContactField, parse_field_list};
pub use message::{Correspondent, MailMessage, escape_html, render_html, render_text};
pub use policy::{ValidatedSubmission, ValidationError, ValidationPolicy};
pub use relay::{DEFAULT_SEND_TIMEOUT, DEFAULT_SUBJECT_PREFIX, Envelope, RelaySettings};
pub use submission::ContactSubmission;
