//! Contact-form API handler.
//!
//! ```text
//! POST /api/contact  Validate a contact submission and relay it by email
//! ```
//!
//! Accepts `application/json` and `application/x-www-form-urlencoded`
//! bodies carrying the same field names.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Error;
use crate::domain::contact::ContactSubmission;
use crate::domain::ports::ContactOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Message returned when the relay is not configured.
pub const QUEUED_MESSAGE: &str = "Email sending not configured yet; message logged for review.";
/// Message returned once the relay accepted the email.
pub const SENT_MESSAGE: &str = "Thanks for reaching out. We will contact you soon.";

/// A submitted value. Forms only ever carry text; JSON clients sometimes
/// send budgets as numbers or flags as booleans.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Flag(flag) => flag.to_string(),
        }
    }
}

/// Contact-form request body. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<FieldValue>,
    #[serde(default)]
    pub project: Option<FieldValue>,
    #[serde(default)]
    pub budget: Option<FieldValue>,
    #[serde(default)]
    pub details: Option<FieldValue>,
    #[serde(default)]
    pub message: Option<FieldValue>,
    #[serde(default)]
    pub institution: Option<FieldValue>,
    #[serde(default)]
    pub address: Option<FieldValue>,
}

impl From<ContactRequest> for ContactSubmission {
    fn from(request: ContactRequest) -> Self {
        Self {
            name: request.name.map(String::from),
            email: request.email.map(String::from),
            project: request.project.map(String::from),
            budget: request.budget.map(String::from),
            details: request.details.map(String::from),
            message: request.message.map(String::from),
            institution: request.institution.map(String::from),
            address: request.address.map(String::from),
        }
    }
}

/// Success body shared by the `queued` and `sent` outcomes.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl From<ContactOutcome> for ContactResponse {
    fn from(outcome: ContactOutcome) -> Self {
        match outcome {
            ContactOutcome::Queued => Self {
                status: "queued",
                message: QUEUED_MESSAGE,
            },
            ContactOutcome::Sent => Self {
                status: "sent",
                message: SENT_MESSAGE,
            },
        }
    }
}

fn rejected_body(requirement: &str, err: &dyn std::fmt::Display) -> actix_web::Error {
    debug!(error = %err, "contact body rejected");
    Error::invalid_request(requirement.to_owned()).into()
}

/// JSON extractor config answering malformed bodies with the same 400 a
/// validation failure produces.
pub fn json_config(requirement: impl Into<String>) -> web::JsonConfig {
    let requirement = requirement.into();
    web::JsonConfig::default()
        .error_handler(move |err, _req: &HttpRequest| rejected_body(&requirement, &err))
}

/// Form extractor counterpart of [`json_config`].
pub fn form_config(requirement: impl Into<String>) -> web::FormConfig {
    let requirement = requirement.into();
    web::FormConfig::default()
        .error_handler(move |err, _req: &HttpRequest| rejected_body(&requirement, &err))
}

/// Submit a contact-form message.
///
/// # Responses
///
/// - `200 OK` `{"status": "sent", ...}`: the relay accepted the email.
/// - `202 Accepted` `{"status": "queued", ...}`: no relay configured; the
///   payload was logged.
///
/// # Errors
///
/// - `400 Bad Request`: required fields missing or the body is malformed.
/// - `500 Internal Server Error`: the relay failed or timed out.
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    payload: web::Either<web::Json<ContactRequest>, web::Form<ContactRequest>>,
) -> ApiResult<HttpResponse> {
    let request = match payload {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };

    let outcome = state.contact.submit(request.into()).await?;
    let body = ContactResponse::from(outcome);
    Ok(match outcome {
        ContactOutcome::Queued => HttpResponse::Accepted().json(body),
        ContactOutcome::Sent => HttpResponse::Ok().json(body),
    })
}
