use std::fmt;

use thiserror::Error;

use crate::domain::auth::models::AppId;

/// Error for identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Identifier must be positive, got {0}")]
    NotPositive(i64),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for plaintext password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Failures reported by the storage gateway.
///
/// Absence is not an error here: lookups return `Option`.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Error taxonomy of the authentication service.
///
/// Only the variant crosses the transport boundary; the `Internal`
/// payload is for logs.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Application not found: {0}")]
    ApplicationNotFound(AppId),

    #[error("Internal error in {op}: {reason}")]
    Internal { op: &'static str, reason: String },
}

impl AuthError {
    /// Tag an unclassified failure with the operation it happened in.
    pub fn internal(op: &'static str, reason: impl fmt::Display) -> Self {
        AuthError::Internal {
            op,
            reason: reason.to_string(),
        }
    }
}
