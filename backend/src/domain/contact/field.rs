//! Names of the fields a contact form may carry.

use std::fmt;
use std::str::FromStr;

/// A single contact-form field.
///
/// The declaration order of [`ContactField::CONTENT`] is the order fields are
/// rendered into outgoing mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    /// Submitter's name.
    Name,
    /// Submitter's email address.
    Email,
    /// Project summary.
    Project,
    /// Budget indication.
    Budget,
    /// Free-form project details.
    Details,
    /// Free-form message.
    Message,
    /// Submitter's institution.
    Institution,
    /// Postal address.
    Address,
}

/// Raised when configuration names a field this form does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contact field: {0}")]
pub struct UnknownContactField(pub String);

impl ContactField {
    /// Content fields in rendering order.
    pub const CONTENT: [Self; 6] = [
        Self::Project,
        Self::Budget,
        Self::Details,
        Self::Message,
        Self::Institution,
        Self::Address,
    ];

    /// Key used on the wire (JSON member or form field).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Project => "project",
            Self::Budget => "budget",
            Self::Details => "details",
            Self::Message => "message",
            Self::Institution => "institution",
            Self::Address => "address",
        }
    }

    /// Human label used when rendering mail bodies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Project => "Project",
            Self::Budget => "Budget",
            Self::Details => "Details",
            Self::Message => "Message",
            Self::Institution => "Institution",
            Self::Address => "Address",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContactField {
    type Err = UnknownContactField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "project" => Ok(Self::Project),
            "budget" => Ok(Self::Budget),
            "details" => Ok(Self::Details),
            "message" => Ok(Self::Message),
            "institution" => Ok(Self::Institution),
            "address" => Ok(Self::Address),
            _ => Err(UnknownContactField(s.trim().to_owned())),
        }
    }
}

/// Parse field names from list entries. Each entry may itself be a
/// comma-separated list; blank names are skipped.
///
/// # Examples
/// ```
/// use contact_backend::domain::contact::{parse_field_list, ContactField};
///
/// let fields = parse_field_list(["message, details", "", "budget"]).expect("known fields");
/// assert_eq!(
///     fields,
///     vec![ContactField::Message, ContactField::Details, ContactField::Budget]
/// );
/// ```
pub fn parse_field_list<I, S>(entries: I) -> Result<Vec<ContactField>, UnknownContactField>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fields = Vec::new();
    for entry in entries {
        for name in entry.as_ref().split(',').map(str::trim) {
            if !name.is_empty() {
                fields.push(name.parse()?);
            }
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("name", ContactField::Name)]
    #[case(" Email ", ContactField::Email)]
    #[case("BUDGET", ContactField::Budget)]
    fn parses_known_names(#[case] raw: &str, #[case] expected: ContactField) {
        assert_eq!(raw.parse::<ContactField>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_names() {
        let err = parse_field_list(["message,phone"]).expect_err("phone is not a field");
        assert_eq!(err.to_string(), "unknown contact field: phone");
    }

    #[rstest]
    fn key_round_trips_through_from_str() {
        for field in ContactField::CONTENT {
            assert_eq!(field.key().parse::<ContactField>(), Ok(field));
        }
    }
}
