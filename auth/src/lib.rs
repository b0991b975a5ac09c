//! Credential codec library
//!
//! Stateless primitives used by the session service:
//! - Password hashing (Argon2id, fixed work factor)
//! - Access-token signing and parsing (HS256 only)
//! - Opaque refresh secrets and their SHA-256 digests
//!
//! Nothing here touches storage. Revocation and blacklisting are the
//! caller's concern.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Str0ng!pw").unwrap();
//! assert!(hasher.verify("Str0ng!pw", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::Authenticator;
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//! let issued = auth
//!     .issue_access_token("user123", Utc::now(), Duration::minutes(15))
//!     .unwrap();
//! let claims = auth.parse_access_token(&issued.token).unwrap();
//! assert_eq!(claims.jti, issued.claims.jti);
//! ```
//!
//! ## Refresh Secrets
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//! let refresh = auth.issue_refresh_secret();
//! assert_eq!(auth.digest_refresh_secret(&refresh.secret), refresh.digest);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedAccessToken;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshSecret;
