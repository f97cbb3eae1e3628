//! Rendering a validated submission into an outgoing mail message.

use std::borrow::Cow;
use std::fmt;

use super::{Envelope, ValidatedSubmission};

/// A mailbox: address plus optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondent {
    /// Display name shown by mail clients.
    pub display_name: Option<String>,
    /// Bare address.
    pub address: String,
}

impl fmt::Display for Correspondent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// Mail handed to the relay. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender.
    pub from: Correspondent,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Submitter's address so operator replies reach them.
    pub reply_to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body with every submitted value escaped.
    pub html: String,
}

impl MailMessage {
    /// Compose the message for `submission` using `envelope` addressing.
    ///
    /// # Examples
    /// ```
    /// use contact_backend::domain::contact::{
    ///     ContactField, ContactSubmission, Envelope, MailMessage, ValidationPolicy,
    /// };
    ///
    /// let submission = ContactSubmission::default()
    ///     .with(ContactField::Name, "Jane Doe")
    ///     .with(ContactField::Email, "jane@example.com")
    ///     .with(ContactField::Message, "Hello");
    /// let validated = ValidationPolicy::default()
    ///     .validate(&submission)
    ///     .expect("valid submission");
    /// let envelope = Envelope {
    ///     from_address: "relay@example.com".into(),
    ///     from_name: None,
    ///     to: vec!["inbox@example.com".into()],
    ///     subject_prefix: "Project Inquiry from".into(),
    /// };
    ///
    /// let message = MailMessage::compose(&validated, &envelope);
    /// assert_eq!(message.subject, "Project Inquiry from Jane Doe");
    /// assert_eq!(message.reply_to, "jane@example.com");
    /// assert!(message.text.ends_with("From: Jane Doe (jane@example.com)"));
    /// ```
    #[must_use]
    pub fn compose(submission: &ValidatedSubmission<'_>, envelope: &Envelope) -> Self {
        let display_name = envelope
            .from_name
            .clone()
            .unwrap_or_else(|| submission.name().to_owned());
        Self {
            from: Correspondent {
                display_name: Some(display_name),
                address: envelope.from_address.clone(),
            },
            to: envelope.to.clone(),
            reply_to: submission.email().to_owned(),
            subject: format!("{} {}", envelope.subject_prefix, submission.name()),
            text: render_text(submission),
            html: render_html(submission),
        }
    }
}

/// Plain-text body: one `Label: value` line per content field, a blank line,
/// then `From: name (email)`.
#[must_use]
pub fn render_text(submission: &ValidatedSubmission<'_>) -> String {
    let mut lines: Vec<String> = submission
        .submission()
        .content()
        .map(|(field, value)| format!("{}: {value}", field.label()))
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "From: {} ({})",
        submission.name(),
        submission.email()
    ));
    lines.join("\n")
}

/// HTML body: one paragraph per content field followed by a `From`
/// paragraph. Values are escaped.
#[must_use]
pub fn render_html(submission: &ValidatedSubmission<'_>) -> String {
    let mut html = String::new();
    for (field, value) in submission.submission().content() {
        html.push_str(&format!("<p>{}: {}</p>", field.label(), escape_html(value)));
    }
    html.push_str(&format!(
        "<p>From: {} ({})</p>",
        escape_html(submission.name()),
        escape_html(submission.email())
    ));
    html
}

/// Escape the HTML-special characters `& < > " '`.
///
/// # Examples
/// ```
/// use contact_backend::domain::contact::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
#[must_use]
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
