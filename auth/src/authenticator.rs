use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh;
use crate::refresh::RefreshSecret;

/// Credential codec combining password hashing, access-token signing and
/// refresh-secret generation.
///
/// Stateless apart from the signing key; build once at startup and share.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// A signed access token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    /// Compact JWS
    pub token: String,
    pub claims: AccessClaims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for access-token signing
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable or verification failed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Spend the cost of one password verification without a stored hash.
    ///
    /// Used when the account is unknown, so that path takes as long as a
    /// wrong password.
    pub fn verify_password_without_account(&self, password: &str) {
        self.password_hasher.verify_dummy(password);
    }

    /// Sign a new access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Subject of the token
    /// * `now` - Issue time
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Signed token and its claims (including the fresh `jti`)
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_access_token(
        &self,
        user_id: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<IssuedAccessToken, JwtError> {
        let claims = AccessClaims::new(user_id, now, ttl);
        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedAccessToken { token, claims })
    }

    /// Verify signature, algorithm and expiry of an access token.
    ///
    /// Blacklist membership is not checked here.
    ///
    /// # Errors
    /// * `JwtError` - Token is forged, malformed or expired
    pub fn parse_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Generate an opaque refresh secret and the digest to persist.
    pub fn issue_refresh_secret(&self) -> RefreshSecret {
        RefreshSecret::generate()
    }

    /// Digest a presented refresh secret for lookup.
    pub fn digest_refresh_secret(&self, secret: &str) -> String {
        refresh::digest(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"test_secret_key_at_least_32_bytes!")
    }

    #[test]
    fn test_verify_password_success() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("Str0ng!pw")
            .expect("Failed to hash password");

        assert!(authenticator.verify_password("Str0ng!pw", &hash).is_ok());
    }

    #[test]
    fn test_verify_password_mismatch() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("Str0ng!pw")
            .expect("Failed to hash password");

        let result = authenticator.verify_password("Wr0ng!pw", &hash);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_corrupt_hash() {
        let result = authenticator().verify_password("Str0ng!pw", "not-a-phc-string");
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(_))
        ));
    }

    #[test]
    fn test_issue_and_parse_access_token() {
        let authenticator = authenticator();
        let now = Utc::now();

        let issued = authenticator
            .issue_access_token("user123", now, Duration::minutes(15))
            .expect("Failed to issue token");

        let claims = authenticator
            .parse_access_token(&issued.token)
            .expect("Token validation failed");

        assert_eq!(claims, issued.claims);
        assert_eq!(claims.user_id, "user123");
        assert_eq!(claims.exp, (now + Duration::minutes(15)).timestamp());
    }

    #[test]
    fn test_parse_token_from_other_key() {
        let issued = Authenticator::new(b"another_secret_key_at_least_32_bytes")
            .issue_access_token("user123", Utc::now(), Duration::minutes(15))
            .unwrap();

        let result = authenticator().parse_access_token(&issued.token);
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_secret_digest_roundtrip() {
        let authenticator = authenticator();
        let generated = authenticator.issue_refresh_secret();

        assert_eq!(
            authenticator.digest_refresh_secret(&generated.secret),
            generated.digest
        );
        assert_ne!(generated.secret, generated.digest);
    }
}
