use crate::error::RepositoryError;
use crate::models::Session;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

/// Repository for server-side session records
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new SessionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a session for a user with the given expiry
    pub async fn create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<Session, RepositoryError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES (?, ?, ?)
            RETURNING id, token, user_id, created_at, expires_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Look up a session by token; expired sessions are not returned
    pub async fn find_valid(
        &self,
        token: &str,
        now: NaiveDateTime,
    ) -> Result<Option<Session>, RepositoryError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = ? AND expires_at > ?
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Delete a session by token (logout)
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete all sessions for a user, used before issuing a fresh one
    pub async fn delete_for_user(&self, user_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Sweep expired sessions
    pub async fn delete_expired(&self, now: NaiveDateTime) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
