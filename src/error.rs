//! Application error types for the command layer.
//!
//! These errors are serializable and can be returned from command handlers
//! to provide meaningful error messages to the frontend.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors that can be returned from commands.
///
/// All variants serialize to a structured JSON object for frontend consumption.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },

    /// Requested resource not found.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Preference store could not be read or written.
    #[error("Preferences error: {message}")]
    Preferences { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create a not found error with ID.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a preferences error.
    pub fn preferences(message: impl Into<String>) -> Self {
        Self::Preferences {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<tauri_plugin_store::Error> for AppError {
    fn from(err: tauri_plugin_store::Error) -> Self {
        Self::preferences(format!("Preference store error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        use crate::db::DbError;

        match err {
            DbError::Sqlite(e) => Self::database(e.to_string()),
            DbError::Migration(message) => Self::database_with_op(message, "migrate"),
        }
    }
}

impl From<crate::review::ReviewError> for AppError {
    fn from(err: crate::review::ReviewError) -> Self {
        use crate::review::ReviewError;

        match err {
            ReviewError::LevelNotFound { level } => {
                Self::not_found_with_id("ReviewLevel", level.to_string())
            }
            ReviewError::DuplicateLevel { .. } | ReviewError::InvalidLevel => {
                Self::invalid_input_field(err.to_string(), "reviewLevels")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewError;

    #[test]
    fn test_error_serialization() {
        let err = AppError::database("connection failed");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Database\""));
        assert!(json.contains("connection failed"));
    }

    #[test]
    fn test_not_found_with_id() {
        let err = AppError::not_found_with_id("Requirement", "123");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"resource\":\"Requirement\""));
        assert!(json.contains("\"id\":\"123\""));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::database("error");
        let json = serde_json::to_string(&err).unwrap();
        // operation is None, so should not appear
        assert!(!json.contains("operation"));
    }

    #[test]
    fn test_migration_error_keeps_operation() {
        let err: AppError = crate::db::DbError::Migration("bad schema".to_string()).into();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"operation\":\"migrate\""));
        assert!(json.contains("bad schema"));
    }

    #[test]
    fn test_review_error_conversion() {
        let err: AppError = ReviewError::LevelNotFound { level: 3 }.into();
        match err {
            AppError::NotFound { resource, id } => {
                assert_eq!(resource, "ReviewLevel");
                assert_eq!(id.as_deref(), Some("3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err: AppError = ReviewError::DuplicateLevel { level: 1 }.into();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::invalid_input_field("title must not be empty", "title");
        assert_eq!(format!("{}", err), "Invalid input: title must not be empty");
    }
}
