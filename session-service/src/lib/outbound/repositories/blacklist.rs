use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::session::errors::SessionError;
use crate::domain::session::ports::blacklist_key;
use crate::domain::session::ports::AccessTokenBlacklist;

/// Access token blacklist kept in a Postgres table.
///
/// Entries carry their own expiry. Lookups ignore expired rows, so a stale
/// row is harmless until `purge_expired` removes it.
pub struct PostgresAccessTokenBlacklist {
    pool: PgPool,
}

impl PostgresAccessTokenBlacklist {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete entries whose expiry has passed.
    ///
    /// # Returns
    /// Number of entries deleted
    ///
    /// # Errors
    /// * `BlacklistError` - Database operation failed
    pub async fn purge_expired(&self) -> Result<u64, SessionError> {
        let result = sqlx::query(
            r#"
            DELETE FROM access_token_blacklist
            WHERE expires_at <= NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::BlacklistError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccessTokenBlacklist for PostgresAccessTokenBlacklist {
    async fn add(&self, jti: &str, ttl: Duration) -> Result<(), SessionError> {
        let expires_at = Utc::now() + ttl;

        sqlx::query(
            r#"
            INSERT INTO access_token_blacklist (key, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET expires_at = GREATEST(access_token_blacklist.expires_at, EXCLUDED.expires_at)
            "#,
        )
        .bind(blacklist_key(jti))
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::BlacklistError(e.to_string()))?;

        Ok(())
    }

    async fn contains(&self, jti: &str) -> Result<bool, SessionError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM access_token_blacklist
                WHERE key = $1 AND expires_at > NOW()
            )
            "#,
        )
        .bind(blacklist_key(jti))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SessionError::BlacklistError(e.to_string()))
    }
}
