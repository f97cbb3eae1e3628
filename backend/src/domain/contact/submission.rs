//! Contact-form submission as received from a caller.

use super::ContactField;

/// One caller-provided contact-form payload.
///
/// Every field is optional at this stage; [`ValidationPolicy`](super::ValidationPolicy)
/// decides which ones must be present. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Submitter's name.
    pub name: Option<String>,
    /// Submitter's email address.
    pub email: Option<String>,
    /// Project summary.
    pub project: Option<String>,
    /// Budget indication.
    pub budget: Option<String>,
    /// Free-form project details.
    pub details: Option<String>,
    /// Free-form message.
    pub message: Option<String>,
    /// Submitter's institution.
    pub institution: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

impl ContactSubmission {
    /// Value of `field` when it carries anything other than whitespace.
    ///
    /// # Examples
    /// ```
    /// use contact_backend::domain::contact::{ContactField, ContactSubmission};
    ///
    /// let submission = ContactSubmission::default()
    ///     .with(ContactField::Name, "Jane Doe")
    ///     .with(ContactField::Message, "   ");
    /// assert_eq!(submission.get(ContactField::Name), Some("Jane Doe"));
    /// assert_eq!(submission.get(ContactField::Message), None);
    /// ```
    #[must_use]
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, field: ContactField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// Non-blank content fields in rendering order.
    pub fn content(&self) -> impl Iterator<Item = (ContactField, &str)> {
        ContactField::CONTENT
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    fn slot(&self, field: ContactField) -> &Option<String> {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Project => &self.project,
            ContactField::Budget => &self.budget,
            ContactField::Details => &self.details,
            ContactField::Message => &self.message,
            ContactField::Institution => &self.institution,
            ContactField::Address => &self.address,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut Option<String> {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Project => &mut self.project,
            ContactField::Budget => &mut self.budget,
            ContactField::Details => &mut self.details,
            ContactField::Message => &mut self.message,
            ContactField::Institution => &mut self.institution,
            ContactField::Address => &mut self.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_follows_rendering_order_and_skips_blanks() {
        let submission = ContactSubmission::default()
            .with(ContactField::Message, "Hello")
            .with(ContactField::Budget, "5k")
            .with(ContactField::Details, "")
            .with(ContactField::Project, "ERP");

        let fields: Vec<_> = submission.content().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![
                ContactField::Project,
                ContactField::Budget,
                ContactField::Message
            ]
        );
    }
}
