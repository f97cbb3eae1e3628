//! Tests for the contact submission service.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::contact::ContactField;
use crate::domain::ports::{MockMailRelay, SendReport};

#[fixture]
fn submission() -> ContactSubmission {
    ContactSubmission::default()
        .with(ContactField::Name, "Jane Doe")
        .with(ContactField::Email, "jane@example.com")
        .with(ContactField::Message, "Hello")
}

#[fixture]
fn configured() -> RelaySettings {
    RelaySettings {
        host: Some("smtp.example.com".into()),
        port: Some(587),
        user: Some("relay@example.com".into()),
        password: Some("s3cr3t-relay-password".into()),
        to: vec!["inbox@example.com".into()],
        ..RelaySettings::default()
    }
}

fn service(relay: MockMailRelay, settings: RelaySettings) -> ContactService<MockMailRelay> {
    ContactService::new(Arc::new(relay), settings, ValidationPolicy::default())
}

#[rstest]
#[case::no_name(ContactField::Name)]
#[case::no_email(ContactField::Email)]
#[tokio::test]
async fn missing_identity_is_rejected_without_sending(
    submission: ContactSubmission,
    configured: RelaySettings,
    #[case] field: ContactField,
) {
    let mut relay = MockMailRelay::new();
    relay.expect_send().times(0);

    let err = service(relay, configured)
        .submit(submission.with(field, ""))
        .await
        .expect_err("validation failure");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.message(),
        "name, email, and at least one of message/details/project/budget are required"
    );
}

#[rstest]
#[tokio::test]
async fn unconfigured_relay_queues_without_sending(submission: ContactSubmission) {
    let mut relay = MockMailRelay::new();
    relay.expect_send().times(0);

    let outcome = service(relay, RelaySettings::default())
        .submit(submission)
        .await
        .expect("queued");

    assert_eq!(outcome, ContactOutcome::Queued);
}

#[rstest]
#[tokio::test]
async fn configured_relay_sends_once_with_reply_to(
    submission: ContactSubmission,
    configured: RelaySettings,
) {
    let mut relay = MockMailRelay::new();
    relay
        .expect_send()
        .withf(|message| {
            message.reply_to == "jane@example.com"
                && message.subject == "Project Inquiry from Jane Doe"
                && message.to == ["inbox@example.com"]
                && message.text.contains("From: Jane Doe (jane@example.com)")
        })
        .times(1)
        .returning(|message| Ok(SendReport::accepted(message.to.clone())));

    let outcome = service(relay, configured)
        .submit(submission)
        .await
        .expect("sent");

    assert_eq!(outcome, ContactOutcome::Sent);
}

#[rstest]
#[tokio::test]
async fn partial_delivery_still_reports_sent(
    submission: ContactSubmission,
    configured: RelaySettings,
) {
    let mut relay = MockMailRelay::new();
    relay.expect_send().times(1).returning(|_| {
        Ok(SendReport {
            accepted: vec![],
            rejected: vec!["inbox@example.com".into()],
            pending: vec![],
        })
    });

    let outcome = service(relay, configured)
        .submit(submission)
        .await
        .expect("sent");

    assert_eq!(outcome, ContactOutcome::Sent);
}

#[rstest]
#[tokio::test]
async fn relay_failure_maps_to_generic_internal_error(
    submission: ContactSubmission,
    configured: RelaySettings,
) {
    let mut relay = MockMailRelay::new();
    relay.expect_send().times(1).returning(|_| {
        Err(MailRelayError::transport(
            "535 authentication failed for s3cr3t-relay-password",
        ))
    });

    let err = service(relay, configured)
        .submit(submission)
        .await
        .expect_err("send failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), SEND_FAILURE_MESSAGE);
    assert!(!err.message().contains("s3cr3t"));
}

struct StalledRelay;

#[async_trait]
impl MailRelay for StalledRelay {
    async fn send(&self, _message: &MailMessage) -> Result<SendReport, MailRelayError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(SendReport::default())
    }
}

#[rstest]
#[tokio::test]
async fn stalled_relay_times_out_as_failure(
    submission: ContactSubmission,
    mut configured: RelaySettings,
) {
    configured.timeout = Some(Duration::from_millis(50));
    let service = ContactService::new(
        Arc::new(StalledRelay),
        configured,
        ValidationPolicy::default(),
    );

    let err = service.submit(submission).await.expect_err("timeout");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), SEND_FAILURE_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn message_required_policy_rejects_project_only(configured: RelaySettings) {
    let mut relay = MockMailRelay::new();
    relay.expect_send().times(0);
    let service = ContactService::new(
        Arc::new(relay),
        configured,
        ValidationPolicy::new([ContactField::Message], []),
    );
    let submission = ContactSubmission::default()
        .with(ContactField::Name, "Jane")
        .with(ContactField::Email, "jane@example.com")
        .with(ContactField::Project, "ERP");

    let err = service.submit(submission).await.expect_err("message missing");

    assert_eq!(err.message(), "name, email, and message are required");
    assert_eq!(service.policy().required().len(), 3);
}
