use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::table::TableError;

/// Message shown when a failure carries nothing the user can act on.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

#[derive(Debug, Display)]
pub enum DashboardError {
    #[display("Transport error: {_0}")]
    Transport(String),

    #[display("Decode error: {_0}")]
    Decode(String),

    #[display("Not authenticated")]
    Unauthenticated,

    #[display("{_0}")]
    Rejected(String),

    #[display("Validation failed: {}", join_field_errors(_0))]
    Validation(Vec<FieldError>),

    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("Bad request: {_0}")]
    BadRequest(String),

    #[display("Internal error: {_0}")]
    Internal(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter()
        .map(|e| format!("{}:{}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::error::Error for DashboardError {}

impl DashboardError {
    /// Message safe to surface as a notice. Upstream transport detail is kept out of it.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Transport(_) | DashboardError::Decode(_) | DashboardError::Internal(_) => {
                GENERIC_FAILURE.to_string()
            }
            DashboardError::Validation(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            other => other.to_string(),
        }
    }
}

impl ResponseError for DashboardError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            DashboardError::Validation(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors,
                    "notice": Notice::error(self.user_message()),
                })
            }
            _ => {
                serde_json::json!({
                    "error": self.to_string(),
                    "notice": Notice::error(self.user_message()),
                })
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Transport(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Decode(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DashboardError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for DashboardError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        DashboardError::Validation(field_errors)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Decode(err.to_string())
    }
}

impl From<JsonPayloadError> for DashboardError {
    fn from(err: JsonPayloadError) -> Self {
        DashboardError::BadRequest(format!("JSON payload error: {}", err))
    }
}

impl From<TableError> for DashboardError {
    fn from(err: TableError) -> Self {
        DashboardError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing feedback for an action (the dashboard's toast).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}
