//! Required-field policy for contact submissions.
//!
//! Deployments disagree on which content fields are mandatory, so the rule
//! is data: a list of fields that must all be present and a list of which at
//! least one must be present. `name` and `email` are always required because
//! the outgoing mail cannot be addressed without them.

use super::{ContactField, ContactSubmission};

/// Raised when a submission does not satisfy the active policy.
///
/// The display text is the policy's full requirement sentence, which is what
/// callers see in the `400` body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{requirement}")]
pub struct ValidationError {
    missing: Vec<ContactField>,
    missing_content: bool,
    requirement: String,
}

impl ValidationError {
    /// Required fields that were absent or blank.
    #[must_use]
    pub fn missing(&self) -> &[ContactField] {
        &self.missing
    }

    /// Whether the "at least one of" requirement was unmet.
    #[must_use]
    pub fn missing_content(&self) -> bool {
        self.missing_content
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedSubmission<'a> {
    name: &'a str,
    email: &'a str,
    submission: &'a ContactSubmission,
}

impl<'a> ValidatedSubmission<'a> {
    /// Submitter's name (non-blank).
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Submitter's email (non-blank).
    #[must_use]
    pub fn email(&self) -> &'a str {
        self.email
    }

    /// The underlying submission.
    #[must_use]
    pub fn submission(&self) -> &'a ContactSubmission {
        self.submission
    }
}

/// Named set of required fields plus named set of alternatives.
///
/// # Examples
/// ```
/// use contact_backend::domain::contact::{ContactField, ContactSubmission, ValidationPolicy};
///
/// let policy = ValidationPolicy::default();
/// let submission = ContactSubmission::default()
///     .with(ContactField::Name, "Jane Doe")
///     .with(ContactField::Email, "jane@example.com");
///
/// let err = policy.validate(&submission).expect_err("no content field");
/// assert_eq!(
///     err.to_string(),
///     "name, email, and at least one of message/details/project/budget are required"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    required: Vec<ContactField>,
    any_of: Vec<ContactField>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(
            [],
            [
                ContactField::Message,
                ContactField::Details,
                ContactField::Project,
                ContactField::Budget,
            ],
        )
    }
}

impl ValidationPolicy {
    /// Build a policy. `name` and `email` are prepended to `required`;
    /// duplicates are dropped.
    pub fn new(
        required: impl IntoIterator<Item = ContactField>,
        any_of: impl IntoIterator<Item = ContactField>,
    ) -> Self {
        let required = dedup([ContactField::Name, ContactField::Email].into_iter().chain(required));
        let any_of = dedup(any_of);
        Self { required, any_of }
    }

    /// Fields that must all be present.
    #[must_use]
    pub fn required(&self) -> &[ContactField] {
        &self.required
    }

    /// Fields of which at least one must be present. Empty means no
    /// alternative requirement.
    #[must_use]
    pub fn any_of(&self) -> &[ContactField] {
        &self.any_of
    }

    /// Human-readable sentence describing the policy.
    #[must_use]
    pub fn requirement(&self) -> String {
        let mut clauses: Vec<String> = self
            .required
            .iter()
            .map(|field| field.key().to_owned())
            .collect();
        match self.any_of.as_slice() {
            [] => {}
            [only] => clauses.push(only.key().to_owned()),
            many => {
                let keys: Vec<&str> = many.iter().map(|field| field.key()).collect();
                clauses.push(format!("at least one of {}", keys.join("/")));
            }
        }
        format!("{} are required", join_clauses(&clauses))
    }

    /// Check `submission` against the policy.
    pub fn validate<'a>(
        &self,
        submission: &'a ContactSubmission,
    ) -> Result<ValidatedSubmission<'a>, ValidationError> {
        let missing: Vec<ContactField> = self
            .required
            .iter()
            .copied()
            .filter(|field| submission.get(*field).is_none())
            .collect();
        let missing_content =
            !self.any_of.is_empty() && self.any_of.iter().all(|field| submission.get(*field).is_none());

        match (
            submission.get(ContactField::Name),
            submission.get(ContactField::Email),
        ) {
            (Some(name), Some(email)) if missing.is_empty() && !missing_content => {
                Ok(ValidatedSubmission {
                    name,
                    email,
                    submission,
                })
            }
            _ => Err(ValidationError {
                missing,
                missing_content,
                requirement: self.requirement(),
            }),
        }
    }
}

fn dedup(fields: impl IntoIterator<Item = ContactField>) -> Vec<ContactField> {
    let mut out = Vec::new();
    for field in fields {
        if !out.contains(&field) {
            out.push(field);
        }
    }
    out
}

fn join_clauses(clauses: &[String]) -> String {
    match clauses {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
