use thiserror::Error;

/// Error type for password hashing and verification.
///
/// A plain mismatch is not an error; `PasswordHasher::verify` reports it as `Ok(false)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
