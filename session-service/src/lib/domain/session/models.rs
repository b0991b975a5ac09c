use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::UserId;

/// Lifetimes applied by the session engine.
///
/// Built once at startup and handed to the service constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
        }
    }
}

/// Where a session was opened from.
///
/// Recorded on every refresh token and carried forward on rotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientInfo {
    pub device_info: String,
    pub ip_address: String,
}

/// Refresh token unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

impl RefreshTokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RefreshTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted refresh token grant.
///
/// Only `token_hash` identifies the secret at rest. After insert the only
/// mutation is flipping `is_revoked` to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token_hash: String,
    pub device_info: String,
    pub ip_address: String,
    pub expires_at: DateTime<Utc>,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the token can still be exchanged at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && !self.is_expired(now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Credentials handed to the client after sign-in, sign-up or rotation.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub refresh_token: String,
    pub access_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("refresh_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Command to open a session for an existing account
#[derive(Debug)]
pub struct SignInCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub client: ClientInfo,
}

impl SignInCommand {
    /// Validate raw credentials into a sign-in command.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email does not match the accepted format
    /// * `InvalidPassword` - Password does not meet the strength policy
    pub fn new(email: String, password: String, client: ClientInfo) -> Result<Self, SessionError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
            client,
        })
    }
}

/// Command to create an account and open its first session
#[derive(Debug)]
pub struct SignUpCommand {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password: Password,
    pub client: ClientInfo,
}

impl SignUpCommand {
    /// Validate raw registration data into a sign-up command.
    ///
    /// # Errors
    /// * `InvalidName` - A name is longer than `PersonName::MAX_LENGTH` or holds NUL
    /// * `InvalidEmail` - Email does not match the accepted format
    /// * `InvalidPassword` - Password does not meet the strength policy
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        client: ClientInfo,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            first_name: PersonName::new(first_name)?,
            last_name: PersonName::new(last_name)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
            client,
        })
    }
}

/// Command to replace the password of the signed-in user
pub struct ChangePasswordCommand {
    /// Checked against the stored hash only, never against the policy.
    pub current_password: String,
    pub new_password: Password,
}

impl ChangePasswordCommand {
    /// # Errors
    /// * `InvalidPassword` - New password does not meet the strength policy
    pub fn new(current_password: String, new_password: String) -> Result<Self, SessionError> {
        Ok(Self {
            current_password,
            new_password: Password::new(new_password)?,
        })
    }
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand")
            .field("current_password", &"<redacted>")
            .field("new_password", &self.new_password)
            .finish()
    }
}
