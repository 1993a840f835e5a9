//! JSON API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::forms::FormErrors;
use crate::domain::DomainError;

/// Error categories exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ValidationError,
    NotFoundError,
    PermissionError,
    ServerError,
}

/// API error response body
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Per-field validation failures, present on form rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldErrorDetail>>,
    /// Whole-form validation failures, present on form rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorDetail {
    pub field: String,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    field_errors: None,
                    form_errors: None,
                },
            },
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorType::PermissionError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation { message, field } => {
                let api = Self::bad_request(message);
                match field {
                    Some(field) => api.with_param(field),
                    None => api,
                }
            }
            DomainError::DuplicateLabel { .. } => {
                Self::bad_request(err.to_string()).with_param("label")
            }
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::LastModelProtected => Self::forbidden(err.to_string()),
            DomainError::Construction { message } => Self::bad_request(message),
            DomainError::Render { message } => Self::bad_request(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        let mut api = Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::ValidationError,
            "The submitted configuration is invalid",
        );
        api.response.error.field_errors = Some(
            errors
                .field_errors
                .iter()
                .map(|e| FieldErrorDetail {
                    field: e.field.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        );
        api.response.error.form_errors = Some(errors.form_errors);
        api
    }
}

impl From<crate::infrastructure::session::SubmitError> for ApiError {
    fn from(err: crate::infrastructure::session::SubmitError) -> Self {
        use crate::infrastructure::session::SubmitError;
        match err {
            SubmitError::Invalid(errors) => errors.into(),
            SubmitError::Domain(err) => err.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_statuses() {
        let err: ApiError = DomainError::LastModelProtected.into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err: ApiError = DomainError::not_found("no model labelled 'x'").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = DomainError::duplicate_label("default").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("label"));
    }

    #[test]
    fn test_form_errors_carry_fields() {
        let mut errors = FormErrors::default();
        errors.push_field("z", "Must be at least 0");
        errors.push_form("Mass step-size must be less than its range.");

        let err: ApiError = errors.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = &err.response.error;
        assert_eq!(detail.field_errors.as_ref().unwrap().len(), 1);
        assert_eq!(detail.form_errors.as_ref().unwrap().len(), 1);
    }
}
