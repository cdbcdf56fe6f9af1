use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::routes::AppRoute;

pub const ACCESS_REQUEST_PATH: &str = "/api/request-api-key";
pub const FORM_HEADING: &str = "Request API Access";
pub const SUBMIT_LABEL: &str = "Submit API Access Request";
pub const PURPOSE_PLACEHOLDER: &str = "Briefly describe how you plan to use the API";
pub const CONFIRMATION_HEADING: &str = "API Access Request Submitted";
pub const CONFIRMATION_BODY: &str =
    "We've received your request. You'll be notified via email about your API key status.";
pub const RETURN_TO_DASHBOARD_LABEL: &str = "Return to Dashboard";
pub const SUBMIT_FAILED_MESSAGE: &str = "We couldn't submit your request. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessRequestInputError {
    #[error("Email is required.")]
    EmptyEmail,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Tell us how you plan to use the API.")]
    EmptyPurpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub email: String,
    pub purpose: String,
}

impl AccessRequest {
    /// Backend acceptance: a `local@domain` email and a non-blank purpose.
    pub fn new(email: &str, purpose: &str) -> Result<Self, AccessRequestInputError> {
        let email = normalize_email(email)?;
        let purpose = required_purpose(purpose)?;
        Ok(Self { email, purpose })
    }

    /// What the browser form sends. Only the purpose is required; the email field is posted
    /// as entered and left to the backend to judge.
    pub fn from_form(email: &str, purpose: &str) -> Result<Self, AccessRequestInputError> {
        let purpose = required_purpose(purpose)?;
        Ok(Self {
            email: email.to_string(),
            purpose,
        })
    }
}

fn required_purpose(raw: &str) -> Result<String, AccessRequestInputError> {
    let purpose = raw.trim();
    if purpose.is_empty() {
        return Err(AccessRequestInputError::EmptyPurpose);
    }
    Ok(purpose.to_string())
}

/// Trims and checks the `local@domain` shape. Case is preserved.
pub fn normalize_email(raw: &str) -> Result<String, AccessRequestInputError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(AccessRequestInputError::EmptyEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AccessRequestInputError::InvalidEmail);
    };
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(AccessRequestInputError::InvalidEmail);
    }
    Ok(email.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// One JSON POST. Implementations send `content-type: application/json` and report the
/// status without interpreting the body.
#[async_trait(?Send)]
pub trait AccessRequestTransport {
    type Error: Display;

    async fn post_access_request(
        &self,
        path: &str,
        request: &AccessRequest,
    ) -> Result<TransportResponse, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] AccessRequestInputError),
    #[error("an access request is already in flight")]
    InFlight,
    #[error("the access request was already submitted")]
    AlreadySubmitted,
    #[error("access request transport failed: {0}")]
    Network(String),
    #[error("access request rejected with status {0}")]
    Status(u16),
}

impl SubmitError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => error.to_string(),
            Self::InFlight | Self::AlreadySubmitted | Self::Network(_) | Self::Status(_) => {
                SUBMIT_FAILED_MESSAGE.to_string()
            }
        }
    }
}

pub async fn submit_access_request<T>(
    transport: &T,
    request: &AccessRequest,
) -> Result<TransportResponse, SubmitError>
where
    T: AccessRequestTransport + ?Sized,
{
    let response = transport
        .post_access_request(ACCESS_REQUEST_PATH, request)
        .await
        .map_err(|error| {
            tracing::warn!(error = %error, "access request transport failed");
            SubmitError::Network(error.to_string())
        })?;
    if !response.is_success() {
        tracing::warn!(status = response.status, "access request rejected");
        return Err(SubmitError::Status(response.status));
    }
    Ok(response)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    Form {
        email: String,
        purpose: String,
        error: Option<String>,
        submitting: bool,
    },
    Confirmation {
        heading: &'static str,
        body: &'static str,
        return_label: &'static str,
        return_route: AppRoute,
    },
}

/// Local state of the access-request view. Entered values survive a failed submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequestForm {
    email: String,
    purpose: String,
    phase: FormPhase,
    last_error: Option<String>,
}

impl AccessRequestForm {
    pub fn new(initial_email: &str) -> Self {
        Self {
            email: initial_email.to_string(),
            ..Self::default()
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_email(&mut self, value: &str) {
        if self.phase == FormPhase::Editing {
            value.clone_into(&mut self.email);
        }
    }

    pub fn set_purpose(&mut self, value: &str) {
        if self.phase == FormPhase::Editing {
            value.clone_into(&mut self.purpose);
        }
    }

    pub fn begin_submit(&mut self) -> Result<AccessRequest, SubmitError> {
        match self.phase {
            FormPhase::Submitting => return Err(SubmitError::InFlight),
            FormPhase::Submitted => return Err(SubmitError::AlreadySubmitted),
            FormPhase::Editing => {}
        }
        match AccessRequest::from_form(&self.email, &self.purpose) {
            Ok(request) => {
                self.phase = FormPhase::Submitting;
                self.last_error = None;
                Ok(request)
            }
            Err(error) => {
                let error = SubmitError::from(error);
                self.last_error = Some(error.user_message());
                Err(error)
            }
        }
    }

    pub fn finish_submit(&mut self, result: &Result<TransportResponse, SubmitError>) {
        if self.phase != FormPhase::Submitting {
            return;
        }
        match result {
            Ok(_) => {
                self.phase = FormPhase::Submitted;
                self.last_error = None;
            }
            Err(error) => {
                self.phase = FormPhase::Editing;
                self.last_error = Some(error.user_message());
            }
        }
    }

    pub async fn submit<T>(&mut self, transport: &T) -> Result<TransportResponse, SubmitError>
    where
        T: AccessRequestTransport + ?Sized,
    {
        let request = self.begin_submit()?;
        let result = submit_access_request(transport, &request).await;
        self.finish_submit(&result);
        result
    }

    pub fn return_route(&self) -> AppRoute {
        AppRoute::DashboardHome
    }

    pub fn view(&self) -> FormView {
        match self.phase {
            FormPhase::Submitted => FormView::Confirmation {
                heading: CONFIRMATION_HEADING,
                body: CONFIRMATION_BODY,
                return_label: RETURN_TO_DASHBOARD_LABEL,
                return_route: self.return_route(),
            },
            FormPhase::Editing | FormPhase::Submitting => FormView::Form {
                email: self.email.clone(),
                purpose: self.purpose.clone(),
                error: self.last_error.clone(),
                submitting: self.phase == FormPhase::Submitting,
            },
        }
    }
}
