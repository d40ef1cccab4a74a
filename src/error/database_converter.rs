use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured `AppError` variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// `operation` describes what was being attempted and ends up in the
    /// error response for database failures.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("Resource not found"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(
                    message,
                    info.details(),
                    info.constraint_name(),
                ) {
                    Some((entity, field, value)) => AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                    None => Self::database(operation, format!("Unique constraint violation: {message}")),
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                match ConstraintParser::parse_not_null_violation(message) {
                    Some(field) => AppError::Validation {
                        field,
                        reason: "Field is required".to_string(),
                    },
                    None => Self::database(operation, format!("Not null constraint violation: {message}")),
                }
            }
            _ => Self::database(operation, format!("Database error: {message}")),
        }
    }

    fn database(operation: &str, detail: String) -> AppError {
        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(detail),
        }
    }
}
