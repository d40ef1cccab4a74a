//! Error handler for converting AppError to HTTP responses.
//!
//! Every error leaves the API as a JSON `ErrorResponse`. Server-side
//! failures are logged with their source chain and reported to the client
//! without internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);

    match error {
        AppError::NotFound { message }
        | AppError::BadRequest { message }
        | AppError::Unauthorized { message } => ErrorResponse::new(code, message.as_str()),
        AppError::Duplicate {
            entity,
            field,
            value,
        } => ErrorResponse::new(code, format!("{field} '{value}' already exists"))
            .with_details(json!({ "entity": entity, "field": field, "value": value })),
        AppError::Validation { field, reason } => {
            ErrorResponse::new(code, format!("Validation failed for {field}: {reason}"))
                .with_details(json!([{ "field": field, "message": reason }]))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, "Request validation failed").with_details(json!(errors))
        }
        AppError::Database { operation, .. } => {
            ErrorResponse::new(code, format!("Database operation failed: {operation}"))
        }
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, format!("Configuration error: {key}"))
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(error_body(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = body_of(AppError::not_found("User not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "User not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors_listed_in_details() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            }],
        };
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        };
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("secret"));
    }

    #[test]
    fn test_status_codes() {
        let duplicate = AppError::Duplicate {
            entity: "accounts".to_string(),
            field: "email".to_string(),
            value: "a@b.c".to_string(),
        };
        assert_eq!(error_to_status_code(&duplicate), StatusCode::CONFLICT);

        let validation = AppError::Validation {
            field: "skip".to_string(),
            reason: "must be greater than or equal to 0".to_string(),
        };
        assert_eq!(error_to_status_code(&validation), StatusCode::UNPROCESSABLE_ENTITY);

        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("timed out"),
        };
        assert_eq!(error_to_status_code(&pool), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            error_to_status_code(&AppError::Unauthorized {
                message: "Missing authorization header".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
    }
}
