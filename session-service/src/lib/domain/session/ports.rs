use async_trait::async_trait;
use auth::AccessClaims;
use chrono::Duration;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::ChangePasswordCommand;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::SignInCommand;
use crate::domain::session::models::SignUpCommand;
use crate::domain::session::models::TokenPair;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UserId;

/// Port for session lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and open a new session, revoking any other.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and client metadata
    ///
    /// # Returns
    /// Fresh refresh secret and access token
    ///
    /// # Errors
    /// * `UserNotFound` - No account for this email
    /// * `PasswordMismatch` - Password does not match the stored hash
    /// * `DatabaseError` - Store operation failed
    async fn sign_in(&self, command: SignInCommand) -> Result<TokenPair, SessionError>;

    /// Create an account and open its first session.
    ///
    /// # Arguments
    /// * `command` - Validated registration data and client metadata
    ///
    /// # Returns
    /// Fresh refresh secret and access token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<TokenPair, SessionError>;

    /// End every session of the token's owner and blacklist the token.
    ///
    /// # Arguments
    /// * `claims` - Claims of the verified access token presented by the caller
    ///
    /// # Errors
    /// * `Unauthorized` - Claims do not name a valid user
    /// * `DatabaseError` / `BlacklistError` - Store operation failed
    async fn log_out(&self, claims: &AccessClaims) -> Result<(), SessionError>;

    /// Exchange a refresh secret for a new token pair. Each secret works once.
    ///
    /// # Arguments
    /// * `refresh_token` - Opaque secret issued by a previous call
    ///
    /// # Returns
    /// New refresh secret and access token
    ///
    /// # Errors
    /// * `RefreshTokenNotFound` - Secret was never issued
    /// * `RefreshTokenRevoked` - Secret was already used or its session ended
    /// * `RefreshTokenExpired` - Secret outlived its expiry
    /// * `DatabaseError` - Store operation failed
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;

    /// Check an access token's signature, expiry and blacklist status.
    ///
    /// # Arguments
    /// * `access_token` - Compact JWS from the Authorization header
    ///
    /// # Returns
    /// Verified claims
    ///
    /// # Errors
    /// * `Unauthorized` - Token is forged, malformed, expired or blacklisted
    /// * `BlacklistError` - Blacklist store unavailable
    async fn verify_access_token(&self, access_token: &str)
        -> Result<AccessClaims, SessionError>;

    /// Replace the caller's password and end all of their sessions.
    ///
    /// # Arguments
    /// * `claims` - Claims of the verified access token presented by the caller
    /// * `command` - Current password and validated new password
    ///
    /// # Errors
    /// * `PasswordMismatch` - Current password does not match
    /// * `UserNotFound` - Account no longer exists
    /// * `DatabaseError` / `BlacklistError` - Store operation failed
    async fn change_password(
        &self,
        claims: &AccessClaims,
        command: ChangePasswordCommand,
    ) -> Result<(), SessionError>;
}

/// Persistence operations for user credentials.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Resolve a user identifier by email.
    ///
    /// # Returns
    /// Optional user ID (None if no account uses the email)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_id_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserId>, SessionError>;

    /// Fetch the stored password hash of a user.
    ///
    /// # Returns
    /// Optional PHC hash string (None if the user does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_password_hash(&self, id: &UserId) -> Result<Option<String>, SessionError>;

    /// Persist a new user.
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email uniqueness constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<UserId, SessionError>;

    /// Replace the stored password hash of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), SessionError>;
}

/// Persistence operations for refresh token grants.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a newly issued refresh token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, token: RefreshToken) -> Result<(), SessionError>;

    /// Look a refresh token up by the digest of its secret.
    ///
    /// # Returns
    /// Optional token record, revoked and expired ones included
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, SessionError>;

    /// Revoke every token of a user that is neither revoked nor expired.
    ///
    /// # Returns
    /// Number of tokens revoked (zero is not an error)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn revoke_all_active(&self, user_id: &UserId) -> Result<u64, SessionError>;

    /// Revoke one token if, and only if, it is not revoked yet.
    ///
    /// Must be atomic: of any number of concurrent calls for the same hash,
    /// exactly one returns `true`.
    ///
    /// # Returns
    /// Whether this call performed the revocation
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<bool, SessionError>;
}

/// Self-expiring set of revoked access token identifiers.
#[async_trait]
pub trait AccessTokenBlacklist: Send + Sync + 'static {
    /// Block a token identifier for `ttl`.
    ///
    /// # Errors
    /// * `BlacklistError` - Store operation failed
    async fn add(&self, jti: &str, ttl: Duration) -> Result<(), SessionError>;

    /// Whether a token identifier is currently blocked.
    ///
    /// # Errors
    /// * `BlacklistError` - Store operation failed
    async fn contains(&self, jti: &str) -> Result<bool, SessionError>;
}

/// Key under which a token identifier is blacklisted.
pub fn blacklist_key(jti: &str) -> String {
    format!("AccessBlock:{}", jti)
}
