use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessClaims;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::ChangePasswordCommand;
use crate::domain::session::models::ClientInfo;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::RefreshTokenId;
use crate::domain::session::models::SessionConfig;
use crate::domain::session::models::SignInCommand;
use crate::domain::session::models::SignUpCommand;
use crate::domain::session::models::TokenPair;
use crate::domain::session::ports::AccessTokenBlacklist;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::session::ports::UserRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UserId;

/// Domain service implementation for the credential lifecycle.
///
/// Holds no mutable state of its own. Every cross-request guarantee
/// (single-use refresh secrets in particular) is delegated to the stores.
pub struct SessionService<UR, TR, BL>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    BL: AccessTokenBlacklist,
{
    users: Arc<UR>,
    refresh_tokens: Arc<TR>,
    blacklist: Arc<BL>,
    authenticator: Arc<Authenticator>,
    config: SessionConfig,
}

impl<UR, TR, BL> SessionService<UR, TR, BL>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    BL: AccessTokenBlacklist,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User credential persistence
    /// * `refresh_tokens` - Refresh token persistence
    /// * `blacklist` - Revoked access token store
    /// * `authenticator` - Password and token codec
    /// * `config` - Token lifetimes
    ///
    /// # Returns
    /// Configured session service instance
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<TR>,
        blacklist: Arc<BL>,
        authenticator: Arc<Authenticator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            blacklist,
            authenticator,
            config,
        }
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), SessionError> {
        match self.authenticator.verify_password(password, stored_hash) {
            Ok(()) => Ok(()),
            Err(AuthenticationError::InvalidCredentials) => Err(SessionError::PasswordMismatch),
            Err(e) => Err(SessionError::Hashing(e.to_string())),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, SessionError> {
        self.authenticator
            .hash_password(password)
            .map_err(|e| SessionError::Hashing(e.to_string()))
    }

    /// Sign a fresh access token and persist a fresh refresh grant.
    async fn issue_token_pair(
        &self,
        user_id: UserId,
        client: ClientInfo,
    ) -> Result<TokenPair, SessionError> {
        let now = Utc::now();

        let access = self
            .authenticator
            .issue_access_token(user_id, now, self.config.access_token_ttl)
            .map_err(|e| SessionError::TokenSigning(e.to_string()))?;
        let refresh = self.authenticator.issue_refresh_secret();

        let record = RefreshToken {
            id: RefreshTokenId::new(),
            user_id,
            token_hash: refresh.digest,
            device_info: client.device_info,
            ip_address: client.ip_address,
            expires_at: now + self.config.refresh_token_ttl,
            is_revoked: false,
            created_at: now,
        };
        self.refresh_tokens.create(record).await?;

        Ok(TokenPair {
            refresh_token: refresh.secret,
            access_token: access.token,
        })
    }

    async fn revoke_refresh_tokens(&self, user_id: &UserId) -> Result<(), SessionError> {
        let revoked = self.refresh_tokens.revoke_all_active(user_id).await?;
        if revoked == 0 {
            tracing::info!(user_id = %user_id, "No active refresh tokens to revoke");
        } else {
            tracing::info!(user_id = %user_id, revoked, "Revoked active refresh tokens");
        }
        Ok(())
    }

    /// Revoke every refresh token of the user and block the presented
    /// access token for the rest of its lifetime.
    async fn end_sessions(
        &self,
        user_id: &UserId,
        claims: &AccessClaims,
    ) -> Result<(), SessionError> {
        self.revoke_refresh_tokens(user_id).await?;

        let remaining = claims.remaining_lifetime(Utc::now());
        if remaining > Duration::zero() {
            self.blacklist.add(&claims.jti, remaining).await?;
        } else {
            tracing::debug!(jti = %claims.jti, "Access token already expired; not blacklisted");
        }

        Ok(())
    }
}

fn user_id_from_claims(claims: &AccessClaims) -> Result<UserId, SessionError> {
    UserId::from_string(&claims.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Access token carries an unusable user_id");
        SessionError::Unauthorized
    })
}

#[async_trait]
impl<UR, TR, BL> SessionServicePort for SessionService<UR, TR, BL>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    BL: AccessTokenBlacklist,
{
    async fn sign_in(&self, command: SignInCommand) -> Result<TokenPair, SessionError> {
        let Some(user_id) = self.users.find_id_by_email(&command.email).await? else {
            self.authenticator
                .verify_password_without_account(command.password.as_str());
            tracing::warn!(email = %command.email, "Sign-in for unknown email");
            return Err(SessionError::UserNotFound);
        };

        let Some(stored_hash) = self.users.find_password_hash(&user_id).await? else {
            self.authenticator
                .verify_password_without_account(command.password.as_str());
            tracing::warn!(user_id = %user_id, "Sign-in for user without a password hash");
            return Err(SessionError::UserNotFound);
        };

        if let Err(e) = self.verify_password(command.password.as_str(), &stored_hash) {
            tracing::warn!(user_id = %user_id, error = %e, "Sign-in rejected");
            return Err(e);
        }

        self.revoke_refresh_tokens(&user_id).await?;

        let pair = self.issue_token_pair(user_id, command.client).await?;
        tracing::info!(user_id = %user_id, "User signed in");

        Ok(pair)
    }

    async fn sign_up(&self, command: SignUpCommand) -> Result<TokenPair, SessionError> {
        if self.users.find_id_by_email(&command.email).await?.is_some() {
            return Err(SessionError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password.as_str())?;

        let now = Utc::now();
        let user_id = self
            .users
            .create(NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                email: command.email,
                password_hash,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let pair = self.issue_token_pair(user_id, command.client).await?;
        tracing::info!(user_id = %user_id, "User signed up");

        Ok(pair)
    }

    async fn log_out(&self, claims: &AccessClaims) -> Result<(), SessionError> {
        let user_id = user_id_from_claims(claims)?;

        self.end_sessions(&user_id, claims).await?;
        tracing::info!(user_id = %user_id, jti = %claims.jti, "User logged out");

        Ok(())
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        let token_hash = self.authenticator.digest_refresh_secret(refresh_token);

        let record = self
            .refresh_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(SessionError::RefreshTokenNotFound)?;

        if record.is_revoked {
            tracing::warn!(
                user_id = %record.user_id,
                token_id = %record.id,
                "Revoked refresh token presented"
            );
            return Err(SessionError::RefreshTokenRevoked);
        }

        if record.is_expired(Utc::now()) {
            return Err(SessionError::RefreshTokenExpired);
        }

        if !self.refresh_tokens.revoke_by_token_hash(&token_hash).await? {
            tracing::warn!(
                user_id = %record.user_id,
                token_id = %record.id,
                "Refresh token consumed by a concurrent request"
            );
            return Err(SessionError::RefreshTokenRevoked);
        }

        let client = ClientInfo {
            device_info: record.device_info,
            ip_address: record.ip_address,
        };
        let pair = self.issue_token_pair(record.user_id, client).await?;
        tracing::debug!(user_id = %record.user_id, "Refresh token rotated");

        Ok(pair)
    }

    async fn verify_access_token(&self, access_token: &str) -> Result<AccessClaims, SessionError> {
        let claims = self
            .authenticator
            .parse_access_token(access_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                SessionError::Unauthorized
            })?;

        if self.blacklist.contains(&claims.jti).await? {
            tracing::debug!(jti = %claims.jti, "Blacklisted access token presented");
            return Err(SessionError::Unauthorized);
        }

        Ok(claims)
    }

    async fn change_password(
        &self,
        claims: &AccessClaims,
        command: ChangePasswordCommand,
    ) -> Result<(), SessionError> {
        let user_id = user_id_from_claims(claims)?;

        let stored_hash = self
            .users
            .find_password_hash(&user_id)
            .await?
            .ok_or(SessionError::UserNotFound)?;

        self.verify_password(&command.current_password, &stored_hash)?;

        let new_hash = self.hash_password(command.new_password.as_str())?;
        self.users.update_password_hash(&user_id, &new_hash).await?;

        self.end_sessions(&user_id, claims).await?;
        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }
}
