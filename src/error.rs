use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "2067" || code == "23505")
        .unwrap_or(false)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(e) => {
                if is_unique_violation(e) {
                    "Resource already exists (duplicate entry)".to_string()
                } else {
                    error!("Database error: {:?}", e);
                    "Internal error".to_string()
                }
            }
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
            AppError::TokenExpired => "Token has expired. Please login again.".to_string(),
            AppError::Internal => "Internal error".to_string(),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_map_to_client_statuses() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::InternalWithMsg("bookings_count drift on event e1".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert_eq!(AppError::Database(sqlx::Error::RowNotFound).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
