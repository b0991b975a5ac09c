use thiserror::Error;

use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::NameError;
use crate::domain::user::errors::PasswordPolicyError;

/// Top-level error for all session operations.
///
/// The engine keeps authentication failures apart so they can be logged
/// precisely; the HTTP boundary folds them into one generic response.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    // Input validation
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    // Authentication
    #[error("User not found")]
    UserNotFound,

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Refresh token has been revoked")]
    RefreshTokenRevoked,

    #[error("Refresh token has expired")]
    RefreshTokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    // Conflict
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Blacklist store error: {0}")]
    BlacklistError(String),
}

impl SessionError {
    /// Whether the error comes from a collaborator rather than from the
    /// caller's input or credentials.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            SessionError::Hashing(_)
                | SessionError::TokenSigning(_)
                | SessionError::DatabaseError(_)
                | SessionError::BlacklistError(_)
        )
    }
}
