//! Error taxonomy surfaced to dashboard users

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors caught at the HTTP boundary and rendered as user-visible messages
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{0}")]
    Auth(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("game feed unavailable: {0}")]
    ExternalApi(String),

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("bet {0} not found")]
    NotFound(i64),
}

impl DashboardError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DashboardError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Auth(_) => "auth",
            DashboardError::Storage(_) => "storage",
            DashboardError::ExternalApi(_) => "external_api",
            DashboardError::Validation { .. } => "validation",
            DashboardError::NotFound(_) => "not_found",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::Auth(_) => StatusCode::UNAUTHORIZED,
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Validation { .. } => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<sqlx::Error> for DashboardError {
    fn from(err: sqlx::Error) -> Self {
        DashboardError::Storage(err.to_string())
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let field = match &self {
            DashboardError::Validation { field, .. } => Some(*field),
            _ => None,
        };
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DashboardError::Auth("wrong password".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            DashboardError::validation("stake", "must not be negative").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DashboardError::NotFound(7).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = DashboardError::validation("stake", "must not be negative");
        assert_eq!(err.to_string(), "stake: must not be negative");
        assert_eq!(err.kind(), "validation");
    }
}
