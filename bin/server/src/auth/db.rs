//! Database-backed session store.
//!
//! Each session is one row, keyed by the opaque cookie token. The store is
//! the only cross-request state the server has; all operations are
//! single-row reads and writes.

use chrono::{DateTime, Utc};
use newsroom_access::{Identity, Session, SessionId};
use sqlx::{FromRow, PgPool};

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    pending_nonce: Option<String>,
    identity: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn try_into_session(self) -> Result<Session, sqlx::Error> {
        let identity: Option<Identity> = match self.identity {
            Some(value) => Some(serde_json::from_value(value).map_err(|e| {
                sqlx::Error::Decode(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("invalid identity for session '{}': {}", self.id, e),
                )))
            })?),
            None => None,
        };

        Ok(Session::from_parts(
            SessionId::new(self.id),
            self.pending_nonce,
            identity,
            self.created_at,
            self.expires_at,
        ))
    }
}

/// Repository for session operations.
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a session by ID.
    ///
    /// Expired rows are returned as-is; callers decide whether to drop them.
    pub async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, pending_nonce, identity, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_session()?)),
            None => Ok(None),
        }
    }

    /// Creates a new session row.
    pub async fn create(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, pending_nonce, identity, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.pending_nonce())
        .bind(identity_json(session)?)
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persists the session's current pending-nonce and identity state.
    pub async fn update(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET pending_nonce = $2, identity = $3
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.pending_nonce())
        .bind(identity_json(session)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a session by ID (logout). A missing row is not an error.
    pub async fn delete(&self, id: &SessionId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes expired sessions, returning how many were removed.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn identity_json(session: &Session) -> Result<Option<serde_json::Value>, sqlx::Error> {
    session
        .identity()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| {
            sqlx::Error::Encode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to serialize identity: {}", e),
            )))
        })
}

/// Generates a unique session ID using ULID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(ulid::Ulid::new().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_session_ids_are_cookie_safe() {
        let id = generate_session_id();
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
