//! Structured error types for store and report operations.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Record errors
    MalformedRecord,
    InvalidField,

    // Task state errors
    TaskLocked,
    TaskNotFound,

    // Registration errors
    UsernameTaken,
    PasswordMismatch,
    UsernameEmpty,

    // Access errors
    AccessDenied,

    // Storage errors
    StorageUnavailable,
}

/// Errors surfaced by the core. None of them are fatal to the host process.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("task {index} has already been completed and cannot be edited")]
    TaskLocked { index: usize },

    #[error("no task numbered {index} (valid range 1..={len})")]
    TaskNotFound { index: usize, len: usize },

    #[error("username already exists: {0}")]
    UsernameTaken(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("username cannot be empty")]
    UsernameEmpty,

    #[error("access denied: {action} is available to admin only")]
    AccessDenied { user: String, action: &'static str },

    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TrackerError::MalformedRecord { .. } => ErrorCode::MalformedRecord,
            TrackerError::InvalidField { .. } => ErrorCode::InvalidField,
            TrackerError::TaskLocked { .. } => ErrorCode::TaskLocked,
            TrackerError::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            TrackerError::UsernameTaken(_) => ErrorCode::UsernameTaken,
            TrackerError::PasswordMismatch => ErrorCode::PasswordMismatch,
            TrackerError::UsernameEmpty => ErrorCode::UsernameEmpty,
            TrackerError::AccessDenied { .. } => ErrorCode::AccessDenied,
            TrackerError::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
        }
    }

    // Convenience constructors

    pub fn malformed(reason: impl Into<String>) -> Self {
        TrackerError::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        TrackerError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        TrackerError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for core operations.
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_variants() {
        assert_eq!(
            TrackerError::TaskLocked { index: 1 }.code(),
            ErrorCode::TaskLocked
        );
        assert_eq!(
            TrackerError::UsernameTaken("alice".into()).code(),
            ErrorCode::UsernameTaken
        );
        assert_eq!(
            TrackerError::storage(Path::new("x"), std::io::Error::other("boom")).code(),
            ErrorCode::StorageUnavailable
        );
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::PasswordMismatch).unwrap();
        assert_eq!(json, "\"PASSWORD_MISMATCH\"");
    }

    #[test]
    fn test_access_denied_message() {
        let err = TrackerError::AccessDenied {
            user: "bob".into(),
            action: "display statistics",
        };
        assert_eq!(
            err.to_string(),
            "access denied: display statistics is available to admin only"
        );
    }
}
