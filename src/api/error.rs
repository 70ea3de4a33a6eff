//! HTTP mapping for domain errors
//!
//! Database and internal failures are logged here and answered with a
//! generic 500 body; their detail never reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

pub type ApiResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            DomainError::NotFound => "Resource not found".to_string(),
            DomainError::Validation(msg) | DomainError::Unauthorized(msg) => msg.clone(),
            DomainError::InvalidTransition { .. } => self.to_string(),
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// 403 for editors hitting admin-only routes
pub fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Admin role required" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DomainError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            DomainError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::InvalidTransition {
                from: "NEW".into(),
                to: "CLOSED".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::Database("locked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
