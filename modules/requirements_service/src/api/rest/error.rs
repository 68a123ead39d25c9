//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::RequirementsError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Individual validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    #[serde(skip)]
    retry_after: Option<u64>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            errors: None,
            retry_after: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Emit a `Retry-After` header (seconds)
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after = Some(secs);
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after = self.retry_after;
        let mut response = (status, Json(self)).into_response();

        let headers = response.headers_mut();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        if let Some(secs) = retry_after {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: RequirementsError) -> Problem {
    let detail = error.to_string();
    match error {
        RequirementsError::NotFound { resource, .. } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(detail)
        }

        RequirementsError::Duplicate { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Duplicate").with_detail(detail)
        }

        RequirementsError::Validation { errors } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error")
                .with_detail(errors.join("; "))
                .with_errors(errors)
        }

        RequirementsError::InvalidCredentials
        | RequirementsError::TokenExpired
        | RequirementsError::InvalidToken => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized").with_detail(detail)
        }

        RequirementsError::Forbidden => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(detail)
        }

        RequirementsError::TooManyAttempts { retry_after_secs } => {
            Problem::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
                .with_detail(detail)
                .with_retry_after(retry_after_secs)
        }

        RequirementsError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

impl From<RequirementsError> for Problem {
    fn from(error: RequirementsError) -> Self {
        map_domain_error(error)
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        Problem::new(rejection.status(), "Invalid Request Body").with_detail(rejection.body_text())
    }
}

impl From<FormRejection> for Problem {
    fn from(rejection: FormRejection) -> Self {
        Problem::new(rejection.status(), "Invalid Form Body").with_detail(rejection.body_text())
    }
}

impl From<QueryRejection> for Problem {
    fn from(rejection: QueryRejection) -> Self {
        Problem::new(rejection.status(), "Invalid Query").with_detail(rejection.body_text())
    }
}

impl From<PathRejection> for Problem {
    fn from(rejection: PathRejection) -> Self {
        Problem::new(rejection.status(), "Invalid Path").with_detail(rejection.body_text())
    }
}
